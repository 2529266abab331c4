use crate::clipboard::ClipboardSink;
use crate::collect::Collection;
use crate::commands::{CmdMessage, CmdResult};
use crate::model::ProjectState;
use crate::prompt;

/// Where a built prompt goes. The two switches are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub print: bool,
    pub copy: bool,
}

impl Delivery {
    pub const PRINT: Delivery = Delivery {
        print: true,
        copy: false,
    };
    pub const COPY: Delivery = Delivery {
        print: false,
        copy: true,
    };
}

fn deliver(text: String, delivery: Delivery, clipboard: &dyn ClipboardSink) -> CmdResult {
    let mut result = CmdResult::default();
    if delivery.copy {
        match clipboard.copy(&text) {
            Ok(()) => result.add_message(CmdMessage::success("Data successfully copied to clipboard.")),
            Err(e) => result.add_message(CmdMessage::error(format!(
                "Failed to copy to clipboard: {}",
                e
            ))),
        }
    }
    if delivery.print {
        result.output = Some(text);
    }
    result
}

pub fn first(
    state: &ProjectState,
    collection: &Collection,
    delivery: Delivery,
    clipboard: &dyn ClipboardSink,
) -> CmdResult {
    let text = prompt::first_prompt(state, collection);
    deliver(text, delivery, clipboard).with_problems(collection)
}

pub fn update(
    state: &ProjectState,
    collection: &Collection,
    delivery: Delivery,
    clipboard: &dyn ClipboardSink,
) -> CmdResult {
    let text = prompt::update_prompt(state, collection);
    deliver(text, delivery, clipboard).with_problems(collection)
}

/// Records the tree, every file and every URL as delivered.
pub fn mark_seen(state: &mut ProjectState, collection: &Collection) -> CmdResult {
    let digests = prompt::digests(state, collection);
    let added = state.context.mark_all_seen(digests);
    CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Recorded {} new fingerprint(s); {} known in total.",
            added,
            state.context.seen_digests.len()
        )))
        .with_problems(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemClipboard;
    use crate::collect::CollectedFile;
    use crate::commands::MessageLevel;
    use crate::error::{AssistError, Result};

    struct BrokenClipboard;

    impl ClipboardSink for BrokenClipboard {
        fn copy(&self, _text: &str) -> Result<()> {
            Err(AssistError::Clipboard("no display".into()))
        }
    }

    fn collection() -> Collection {
        Collection {
            files: vec![CollectedFile {
                path: "p/a.txt".into(),
                content: "hello".into(),
            }],
            tree: "p/".into(),
            problems: vec!["Error reading file p/locked: denied".into()],
        }
    }

    #[test]
    fn print_only_does_not_touch_clipboard() {
        let clip = MemClipboard::new();
        let r = first(&ProjectState::default(), &collection(), Delivery::PRINT, &clip);
        assert!(r.output.unwrap().contains("### File: p/a.txt"));
        assert_eq!(clip.count(), 0);
    }

    #[test]
    fn copy_only_prints_nothing() {
        let clip = MemClipboard::new();
        let r = update(&ProjectState::default(), &collection(), Delivery::COPY, &clip);
        assert!(r.output.is_none());
        assert!(clip.last().unwrap().contains("### Updated File: p/a.txt"));
        assert_eq!(r.messages[0].level, MessageLevel::Success);
    }

    #[test]
    fn both_switches_can_be_on() {
        let clip = MemClipboard::new();
        let both = Delivery {
            print: true,
            copy: true,
        };
        let r = first(&ProjectState::default(), &collection(), both, &clip);
        assert_eq!(r.output, clip.last());
    }

    #[test]
    fn clipboard_failure_is_reported() {
        let r = first(
            &ProjectState::default(),
            &collection(),
            Delivery::COPY,
            &BrokenClipboard,
        );
        assert!(r.has_errors());
        assert!(r.messages[0].content.contains("no display"));
    }

    #[test]
    fn problems_become_warnings() {
        let clip = MemClipboard::new();
        let r = first(&ProjectState::default(), &collection(), Delivery::PRINT, &clip);
        assert!(r
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning && m.content.contains("p/locked")));
    }

    #[test]
    fn mark_seen_then_update_is_empty() {
        let clip = MemClipboard::new();
        let mut state = ProjectState::default();
        let c = collection();
        let r = mark_seen(&mut state, &c);
        assert!(r.messages[0].content.starts_with("Recorded 2 new"));

        let again = mark_seen(&mut state, &c);
        assert!(again.messages[0].content.starts_with("Recorded 0 new"));

        let text = update(&state, &c, Delivery::PRINT, &clip).output.unwrap();
        assert!(!text.contains("p/a.txt"));
    }
}
