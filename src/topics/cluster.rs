// Average-linkage agglomerative clustering over cosine similarity.
//
// Every document starts in its own cluster. The two clusters with the
// highest average pairwise similarity are merged, repeatedly, until no pair
// reaches the threshold. Similarities between merged clusters are updated
// with the Lance-Williams formula, so the pairwise matrix is computed once.
//
// Runtime is cubic in the number of documents, which is fine for the few
// hundred chunks a document set produces.

use super::embeddings::cosine_similarity;

/// Group vectors into clusters of member indices.
///
/// Members within a cluster are ascending; clusters are ordered by their
/// first member. Every index appears in exactly one cluster.
pub fn agglomerative(vectors: &[Vec<f64>], threshold: f64) -> Vec<Vec<usize>> {
    let n = vectors.len();
    let mut similarity = vec![vec![0.0_f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let sim = cosine_similarity(&vectors[i], &vectors[j]);
            similarity[i][j] = sim;
            similarity[j][i] = sim;
        }
    }

    let mut members: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();

    loop {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            if members[i].is_none() {
                continue;
            }
            for j in (i + 1)..n {
                if members[j].is_none() {
                    continue;
                }
                let sim = similarity[i][j];
                if best.map_or(true, |(_, _, b)| sim > b) {
                    best = Some((i, j, sim));
                }
            }
        }

        let Some((i, j, sim)) = best else { break };
        if sim < threshold {
            break;
        }

        let merged = members[j].take().unwrap_or_default();
        let size_i = members[i].as_ref().map_or(0, Vec::len) as f64;
        let size_j = merged.len() as f64;

        for k in 0..n {
            if k == i || members[k].is_none() {
                continue;
            }
            let updated =
                (size_i * similarity[i][k] + size_j * similarity[j][k]) / (size_i + size_j);
            similarity[i][k] = updated;
            similarity[k][i] = updated;
        }

        if let Some(cluster) = members[i].as_mut() {
            cluster.extend(merged);
            cluster.sort_unstable();
        }
    }

    members.into_iter().flatten().collect()
}
