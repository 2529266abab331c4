use colored::Colorize;
use gptassist::api::{CmdMessage, MessageLevel};
use gptassist::commands::CmdResult;
use gptassist::model::ProjectState;
use std::io::{self, Write};

const PREFIX: &str = "--";
const PREFIX2: &str = "----";

pub(super) fn write_messages<W: Write>(out: &mut W, messages: &[CmdMessage]) -> io::Result<()> {
    for message in messages {
        match message.level {
            MessageLevel::Info => writeln!(out, "{}", message.content.dimmed())?,
            MessageLevel::Success => writeln!(out, "{}", message.content.green())?,
            MessageLevel::Warning => writeln!(out, "{}", message.content.yellow())?,
            MessageLevel::Error => writeln!(out, "{}", message.content.red())?,
        }
    }
    Ok(())
}

pub(super) fn write_error<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    write_messages(out, &[CmdMessage::error(text)])
}

pub(super) fn write_status<W: Write>(out: &mut W, state: &ProjectState) -> io::Result<()> {
    let ctx = &state.context;
    writeln!(out, "{} {}", "Project Name :".bold(), state.project_name)?;
    writeln!(out, "Dirs:")?;
    writeln!(out, "{} Allowed paths", PREFIX)?;
    for dir in &ctx.allowed_dirs {
        writeln!(out, "{} {}", PREFIX2, dir)?;
    }
    writeln!(out, "{} Restricted paths", PREFIX)?;
    for pattern in &ctx.ignored_patterns {
        writeln!(out, "{} {}", PREFIX2, pattern.dimmed())?;
    }
    writeln!(out, "Urls:")?;
    for url in &ctx.urls {
        writeln!(out, "{} {}", PREFIX, url)?;
    }
    writeln!(out, "Allowed Extensions:")?;
    let exts: Vec<&str> = ctx.allowed_extensions.iter().map(String::as_str).collect();
    writeln!(out, "{} {:?}", PREFIX, exts)?;
    writeln!(out, "Recorded fingerprints: {}", ctx.seen_digests.len())
}

/// Output text first, then the status block, then messages.
pub(super) fn write_result<W: Write>(out: &mut W, result: &CmdResult) -> io::Result<()> {
    if let Some(text) = &result.output {
        writeln!(out, "{}", text)?;
    }
    if let Some(state) = &result.state {
        write_status(out, state)?;
    }
    write_messages(out, &result.messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gptassist::model::Context;

    fn render(result: &CmdResult) -> String {
        let mut out = Vec::new();
        write_result(&mut out, result).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn status_lists_every_section() {
        let mut state = ProjectState::new(Context::seeded(["*.zip"], ["*", "rs"]));
        state.set_project_name("demo");
        state.context.add_dir("src");
        state.context.add_url("https://docs.rs");

        let text = render(&CmdResult::default().with_state(state));
        assert!(text.contains("demo"));
        assert!(text.contains("---- src"));
        assert!(text.contains("*.zip"));
        assert!(text.contains("-- https://docs.rs"));
        assert!(text.contains("[\"*\", \".rs\"]"));
        assert!(text.contains("Recorded fingerprints: 0"));
    }

    #[test]
    fn output_comes_before_messages() {
        let result = CmdResult::default()
            .with_output("TREE".to_string())
            .with_message(CmdMessage::warning("careful"));
        let text = render(&result);
        let tree = text.find("TREE").unwrap();
        let warn = text.find("careful").unwrap();
        assert!(tree < warn);
    }
}
