// tests/properties.rs

use proptest::prelude::*;

use procmux::manifest::Manifest;
use procmux::mux::format::{ELLIPSIS, PALETTE_SIZE, palette_slot, truncate_line};

#[derive(Debug, Clone)]
enum Line {
    Entry { name: String, command: String },
    Blank(String),
    Comment(String),
}

fn line_strategy() -> impl Strategy<Value = Line> {
    prop_oneof![
        ("[a-z][a-z0-9_]{0,7}", "[a-z0-9 =./-]{0,20}")
            .prop_map(|(name, command)| Line::Entry { name, command }),
        "[ \t]{0,4}".prop_map(Line::Blank),
        ("[ ]{0,3}", "[a-z :]{0,12}").prop_map(|(indent, text)| Line::Comment(format!("{indent}#{text}"))),
    ]
}

fn render(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|l| match l {
            Line::Entry { name, command } => format!("{name}: {command}"),
            Line::Blank(s) | Line::Comment(s) => s.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #[test]
    fn only_entry_lines_become_processes(lines in proptest::collection::vec(line_strategy(), 0..30)) {
        let manifest = Manifest::parse(&render(&lines)).expect("generated manifest is valid");

        let expected: Vec<(String, String)> = lines
            .iter()
            .filter_map(|l| match l {
                Line::Entry { name, command } => Some((name.clone(), command.clone())),
                _ => None,
            })
            .collect();

        prop_assert_eq!(manifest.len(), expected.len());
        for (i, (entry, (name, command))) in manifest.iter().zip(expected.iter()).enumerate() {
            prop_assert_eq!(entry.index, i + 1);
            prop_assert_eq!(&entry.name, name);
            prop_assert_eq!(&entry.command, command);
            prop_assert_eq!(entry.palette_slot(), 1 + (i % PALETTE_SIZE));
        }
    }

    #[test]
    fn truncation_is_exact(message in "[ -~]{0,80}", max in 1usize..60) {
        let out = truncate_line(message.as_bytes(), max);

        if message.len() <= max {
            prop_assert_eq!(&*out, message.as_str());
        } else {
            prop_assert!(out.ends_with(ELLIPSIS));
            prop_assert_eq!(out.len(), max + ELLIPSIS.len());
            prop_assert!(out.starts_with(&message[..max]));
        }
    }

    #[test]
    fn truncation_cuts_arbitrary_bytes_at_the_limit(
        raw in proptest::collection::vec(any::<u8>(), 0..120),
        max in 1usize..60,
    ) {
        let out = truncate_line(&raw, max);

        if raw.len() <= max {
            prop_assert_eq!(&*out, &*String::from_utf8_lossy(&raw));
        } else {
            let expected = format!("{}{ELLIPSIS}", String::from_utf8_lossy(&raw[..max]));
            prop_assert_eq!(&*out, expected.as_str());
        }
    }

    #[test]
    fn palette_slots_cycle_through_seven_colors(index in 1usize..10_000) {
        let slot = palette_slot(index);
        prop_assert!((1..=PALETTE_SIZE).contains(&slot));
        prop_assert_eq!(slot, palette_slot(index + PALETTE_SIZE));
        prop_assert_ne!(slot, palette_slot(index + 1));
    }
}
