use super::selector::EligibleStreamer;

pub fn announcement(target: &EligibleStreamer) -> String {
    format!(
        "Raiding {} next! They're streaming {}: https://twitch.tv/{}",
        target.name, target.category, target.name
    )
}

pub fn raid_command(target: &EligibleStreamer) -> String {
    format!("/raid {}", target.name)
}

pub fn no_target() -> String {
    "No raid target found: every candidate is offline or streaming a blacklisted category."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_target_and_category() {
        let target = EligibleStreamer {
            name: "bob".to_string(),
            category: "VALORANT".to_string(),
        };
        let text = announcement(&target);
        assert!(text.contains("bob"));
        assert!(text.contains("VALORANT"));
        assert_eq!(raid_command(&target), "/raid bob");
        assert!(no_target().contains("No raid target found"));
    }
}
