use crate::estimate::parse_duration;
use crate::model::{Task, default_category};
use crate::util::prompt_input;

pub fn edit_interactive(task: &mut Task) {
    let text = prompt_input(&format!("Text [{}]: ", task.text));
    if !text.trim().is_empty() {
        task.text = text.trim().to_string();
    }

    let category = prompt_input(&format!(
        "Category [{}] (empty keep, '-' reset): ",
        task.category
    ));
    let trimmed_category = category.trim();
    if !trimmed_category.is_empty() {
        if trimmed_category == "-" {
            task.category = default_category();
        } else {
            task.category = trimmed_category.to_string();
        }
    }

    let current = task.scheduled_time.as_deref().unwrap_or("-");
    let input = prompt_input(&format!("Time [{}] (empty keep, '-' clear): ", current));
    let trimmed = input.trim();
    if !trimmed.is_empty() {
        if trimmed == "-" {
            task.scheduled_time = None;
        } else {
            task.scheduled_time = Some(trimmed.to_string());
        }
    }

    loop {
        let current = task
            .hours
            .map(|h| format!("{h} h"))
            .unwrap_or_else(|| "-".into());
        let input = prompt_input(&format!("Hours [{}] (empty keep, '-' clear): ", current));
        let trimmed = input.trim();
        if trimmed.is_empty() {
            break;
        }
        if trimmed == "-" {
            task.hours = None;
            break;
        }
        match parse_hours_input(trimmed) {
            Some(hours) => {
                task.hours = Some(hours);
                break;
            }
            None => {
                eprintln!("Invalid hours: expected e.g. \"1.5\" or \"2 hrs\"");
            }
        }
    }
}

/// Duration entered by hand. Input without any number is rejected rather
/// than silently read as zero.
pub fn parse_hours_input(input: &str) -> Option<f64> {
    if !input.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(parse_duration(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hours_input() {
        assert_eq!(parse_hours_input("1.5"), Some(1.5));
        assert_eq!(parse_hours_input("2 hrs"), Some(2.0));
        assert_eq!(parse_hours_input("0"), Some(0.0));
        assert_eq!(parse_hours_input("soon"), None);
    }
}
