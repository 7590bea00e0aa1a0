// Colored terminal output for topic overviews.
//
// The JSON results go to a file or stdout untouched; this is the human
// summary printed alongside.

use colored::Colorize;

use super::truncate_chars;
use crate::pipeline::assign::TopicAssignment;
use crate::topics::model::{TopicInfo, OUTLIER_TOPIC};

/// Display the topic overview table.
pub fn display_topic_info(topics: &[TopicInfo]) {
    if topics.is_empty() {
        println!("No topics found.");
        return;
    }

    let real = topics.iter().filter(|t| t.topic != OUTLIER_TOPIC).count();
    println!(
        "\n{}",
        format!("=== Topics ({real} found) ===").bold()
    );
    println!();

    println!(
        "  {:>5}  {:>5}  {}",
        "Topic".dimmed(),
        "Count".dimmed(),
        "Representation".dimmed(),
    );
    println!("  {}", "-".repeat(72).dimmed());

    for topic in topics {
        let id = if topic.topic == OUTLIER_TOPIC {
            format!("{:>5}", topic.topic).dimmed()
        } else {
            format!("{:>5}", topic.topic).cyan().bold()
        };
        let words: Vec<&str> = topic
            .representation
            .iter()
            .map(String::as_str)
            .filter(|word| !word.is_empty())
            .collect();
        let words = truncate_chars(&words.join(", "), 60);
        println!("  {}  {:>5}  {}", id, topic.count, words);
    }
    println!();
}

/// One-line summary of a finished run.
pub fn display_run_summary(assignments: &[TopicAssignment]) {
    let outliers = assignments.iter().filter(|a| a.is_outlier()).count();
    println!(
        "  {} {} chunks, {} assigned to topics, {} outliers",
        "✓".green().bold(),
        assignments.len(),
        assignments.len() - outliers,
        outliers,
    );
}
