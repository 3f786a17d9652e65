//! Terminal rendering of rewrite results

use colored::Colorize;
use nextmsg::{ResultAggregate, Tone};

/// One group per relationship, one card per variant
pub fn render_aggregate(aggregate: &ResultAggregate) -> String {
    let mut out = String::new();

    for (relationship, variants) in aggregate {
        out.push_str(&format!("{} {}\n", "To:".dimmed(), relationship.label().bold()));
        for variant in variants {
            out.push_str(&format!("  {} {}\n", tone_badge(variant.tone), variant.text));
        }
        out.push('\n');
    }

    out
}

fn tone_badge(tone: Tone) -> colored::ColoredString {
    let badge = format!("[{}]", tone);
    match tone {
        Tone::Soft => badge.magenta(),
        Tone::Standard => badge.cyan(),
        Tone::Short => badge.yellow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextmsg::{Relationship, RewriteResult};

    #[test]
    fn test_render_groups_by_relationship() {
        colored::control::set_override(false);

        let mut aggregate = ResultAggregate::new();
        aggregate.insert(
            Relationship::Friend,
            vec![
                RewriteResult::new(Tone::Standard, "了解！"),
                RewriteResult::new(Tone::Soft, "了解です😊"),
                RewriteResult::new(Tone::Short, "了解"),
            ],
        );
        aggregate.insert(
            Relationship::Boss,
            vec![RewriteResult::new(Tone::Soft, "承知いたしました")],
        );

        let rendered = render_aggregate(&aggregate);

        assert_eq!(
            rendered,
            "To: 上司\n  [Soft] 承知いたしました\n\n\
             To: 友達\n  [Standard] 了解！\n  [Soft] 了解です😊\n  [Short] 了解\n\n"
        );
    }
}
