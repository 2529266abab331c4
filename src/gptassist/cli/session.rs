use super::render::{write_error, write_messages, write_result};
use gptassist::api::AssistApi;
use gptassist::catalog::{ArgMap, Command, CommandKind, CommandResolver, ResolveError, MARKER};
use gptassist::commands::prompt::Delivery;
use gptassist::commands::{CmdMessage, CmdResult};
use gptassist::error::Result;
use gptassist::shell::ShellRunner;
use gptassist::store::StateBackend;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// One interactive run: the API, the resolver in front of it and the shell
/// behind it.
pub(super) struct Session<B: StateBackend> {
    pub api: AssistApi<B>,
    resolver: CommandResolver<'static>,
    shell: Box<dyn ShellRunner>,
    header: String,
    state_file: Option<PathBuf>,
}

enum Flow {
    Continue,
    Exit,
}

/// One input line, trimmed. Bytes that are not UTF-8 are replaced so a
/// stray byte cannot end the session.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut bytes = Vec::new();
    if input.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).trim().to_string()))
}

impl<B: StateBackend> Session<B> {
    pub fn new(
        api: AssistApi<B>,
        resolver: CommandResolver<'static>,
        shell: Box<dyn ShellRunner>,
        header: String,
        state_file: Option<PathBuf>,
    ) -> Self {
        Self {
            api,
            resolver,
            shell,
            header,
            state_file,
        }
    }

    /// Reads lines until `exit`, `quit` or end of input. Only failures to read
    /// stdin or write stdout end the loop early; everything else is reported.
    pub fn run_loop<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.resolver.catalog().help(&self.header))?;
        let started = Instant::now();

        loop {
            write!(out, "({:03} sec) > ", started.elapsed().as_secs())?;
            out.flush()?;

            let Some(line) = read_line(input)? else {
                writeln!(out)?;
                break;
            };
            if let Flow::Exit = self.step(&line, input, out)? {
                break;
            }
        }
        writeln!(out, "Exiting.")?;
        Ok(())
    }

    fn step<R: BufRead, W: Write>(&mut self, line: &str, input: &mut R, out: &mut W) -> Result<Flow> {
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return Ok(Flow::Exit);
        }

        let resolution = self.resolver.resolve(&format!("{}{}", MARKER, line));
        match resolution.outcome {
            Ok(cmd) => match self.dispatch(cmd, &resolution.args, input, out) {
                Ok(result) => write_result(out, &result)?,
                Err(e) => write_error(out, &e.to_string())?,
            },
            Err(ResolveError::Unknown) => self.passthrough(line, out)?,
            Err(e) => write_error(out, &e.to_string())?,
        }
        Ok(Flow::Continue)
    }

    fn passthrough<W: Write>(&self, line: &str, out: &mut W) -> Result<()> {
        debug!("no catalog command in '{}'", line);
        match self.shell.run(line) {
            Ok(shell) => write!(out, "{}", shell.output)?,
            Err(e) => write_error(out, &e.to_string())?,
        }
        Ok(())
    }

    /// Everything typed after the command, or one line read from input.
    fn value_for<R: BufRead, W: Write>(
        &self,
        cmd: &Command,
        args: &ArgMap,
        question: &str,
        input: &mut R,
        out: &mut W,
    ) -> Result<String> {
        if let Some(value) = args.joined(&cmd.key()) {
            return Ok(value);
        }
        write!(out, "{}", question)?;
        out.flush()?;
        Ok(read_line(input)?.unwrap_or_default())
    }

    fn path_for<R: BufRead, W: Write>(
        &self,
        cmd: &Command,
        args: &ArgMap,
        question: &str,
        input: &mut R,
        out: &mut W,
    ) -> Result<Option<PathBuf>> {
        let typed = self.value_for(cmd, args, question, input, out)?;
        if typed.is_empty() {
            return Ok(self.state_file.clone());
        }
        Ok(Some(PathBuf::from(typed)))
    }

    fn extensions(&self) -> String {
        let exts: Vec<&str> = self
            .api
            .state()
            .context
            .allowed_extensions
            .iter()
            .map(String::as_str)
            .collect();
        format!("{:?}", exts)
    }

    fn dispatch<R: BufRead, W: Write>(
        &mut self,
        cmd: &Command,
        args: &ArgMap,
        input: &mut R,
        out: &mut W,
    ) -> Result<CmdResult> {
        if !self.resolver.catalog().is_parameters_valid(args) {
            write_messages(
                out,
                &[CmdMessage::info(format!("Usage:{}", cmd.usage()))],
            )?;
        }

        match cmd.kind {
            CommandKind::Help => {
                Ok(CmdResult::default().with_output(self.resolver.catalog().help(&self.header)))
            }
            CommandKind::Name => {
                let name = self.value_for(cmd, args, "Enter the Project Name : ", input, out)?;
                self.api.set_name(&name)
            }
            CommandKind::AddDir => {
                let dir =
                    self.value_for(cmd, args, "Enter directory to add to allowed list: ", input, out)?;
                self.api.add_dir(&dir)
            }
            CommandKind::RemoveDir => {
                let dir = self.value_for(
                    cmd,
                    args,
                    "Enter directory to remove from allowed list: ",
                    input,
                    out,
                )?;
                self.api.remove_dir(&dir)
            }
            CommandKind::AddIgnore => {
                let pattern =
                    self.value_for(cmd, args, "Enter directory to add to ignore list: ", input, out)?;
                self.api.add_ignore(&pattern)
            }
            CommandKind::RemoveIgnore => {
                let pattern = self.value_for(
                    cmd,
                    args,
                    "Enter directory to remove from ignore list: ",
                    input,
                    out,
                )?;
                self.api.remove_ignore(&pattern)
            }
            CommandKind::AddUrl => {
                let url = self.value_for(cmd, args, "Enter URL to add: ", input, out)?;
                self.api.add_url(&url)
            }
            CommandKind::RemoveUrl => {
                let url = self.value_for(cmd, args, "Enter URL to remove: ", input, out)?;
                self.api.remove_url(&url)
            }
            CommandKind::AddExtension => {
                let question = format!(
                    "Enter extension to add to allowed list:({}): ",
                    self.extensions()
                );
                let ext = self.value_for(cmd, args, &question, input, out)?;
                self.api.add_extension(&ext)
            }
            CommandKind::RemoveExtension => {
                let question = format!(
                    "Enter extension to remove from allowed list:({}): ",
                    self.extensions()
                );
                let ext = self.value_for(cmd, args, &question, input, out)?;
                self.api.remove_extension(&ext)
            }
            CommandKind::Status => self.api.status(),
            CommandKind::PrintDir => self.api.print_tree(),
            CommandKind::Print => self.api.print_all(),
            CommandKind::PromptFirst => self.api.first_prompt(Delivery::PRINT),
            CommandKind::PromptFirstCopy => self.api.first_prompt(Delivery::COPY),
            CommandKind::Prompt => self.api.update_prompt(Delivery::PRINT),
            CommandKind::PromptCopy => self.api.update_prompt(Delivery::COPY),
            CommandKind::Update => self.api.mark_seen(),
            CommandKind::Save => {
                let question = "Enter path to save the context (e.g., context.json): ";
                match self.path_for(cmd, args, question, input, out)? {
                    Some(path) => self.api.save(&path),
                    None => Ok(no_path()),
                }
            }
            CommandKind::Load => {
                let question = "Enter path to load the context (e.g., context.json): ";
                match self.path_for(cmd, args, question, input, out)? {
                    Some(path) => self.api.load(&path),
                    None => Ok(no_path()),
                }
            }
        }
    }
}

fn no_path() -> CmdResult {
    CmdResult::default().with_message(CmdMessage::warning("No path entered."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gptassist::catalog::CATALOG;
    use gptassist::clipboard::MemClipboard;
    use gptassist::collect::ContentCollector;
    use gptassist::error::AssistError;
    use gptassist::model::{Context, ProjectState};
    use gptassist::shell::ShellOutput;
    use gptassist::store::memory::MemBackend;
    use std::cell::RefCell;
    use std::fs;
    use std::io::Cursor;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct FakeShell {
        ran: Rc<RefCell<Vec<String>>>,
    }

    impl ShellRunner for FakeShell {
        fn run(&self, line: &str) -> Result<ShellOutput> {
            self.ran.borrow_mut().push(line.to_string());
            if line.starts_with("missing") {
                return Err(AssistError::Shell("Error running command: not found".into()));
            }
            Ok(ShellOutput {
                output: format!("ran {}\n", line),
                success: true,
            })
        }
    }

    struct Fixture {
        _tmp: TempDir,
        session: Session<MemBackend>,
        shell: FakeShell,
    }

    fn fixture(state_file: Option<&str>) -> Fixture {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("proj/src")).unwrap();
        fs::write(tmp.path().join("proj/src/lib.rs"), "pub fn a() {}").unwrap();
        fs::write(tmp.path().join("proj/README.md"), "readme").unwrap();

        let api = AssistApi::new(
            ProjectState::new(Context::default()),
            MemBackend::new(),
            ContentCollector::new(tmp.path()),
            Box::new(MemClipboard::new()),
        );
        let shell = FakeShell::default();
        let session = Session::new(
            api,
            CommandResolver::new(&CATALOG),
            Box::new(shell.clone()),
            "GPT Assist".to_string(),
            state_file.map(PathBuf::from),
        );
        Fixture {
            _tmp: tmp,
            session,
            shell,
        }
    }

    fn drive(session: &mut Session<MemBackend>, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        session.run_loop(&mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_help_and_prompt() {
        let mut f = fixture(None);
        let out = drive(&mut f.session, "exit\n");
        assert!(out.contains("---------------------- GPT Assist"));
        assert!(out.contains("(000 sec) > "));
        assert!(out.ends_with("Exiting.\n"));
    }

    #[test]
    fn end_of_input_ends_the_loop() {
        let mut f = fixture(None);
        let out = drive(&mut f.session, "dir+ proj\n");
        assert!(out.contains("Exiting."));
        assert_eq!(f.session.api.state().context.allowed_dirs, vec!["proj"]);
    }

    #[test]
    fn inline_values_are_used() {
        let mut f = fixture(None);
        drive(&mut f.session, "dir+ proj\nurl+ https://docs.rs\nextension+ RS\n");
        let ctx = &f.session.api.state().context;
        assert_eq!(ctx.allowed_dirs, vec!["proj"]);
        assert_eq!(ctx.urls, vec!["https://docs.rs"]);
        assert!(ctx.allowed_extensions.contains(".rs"));
    }

    #[test]
    fn missing_values_are_read_from_the_next_line() {
        let mut f = fixture(None);
        let out = drive(&mut f.session, "dir+\nproj\nname\nMy Project\n");
        assert!(out.contains("Enter directory to add to allowed list: "));
        assert!(out.contains("Enter the Project Name : "));
        assert_eq!(f.session.api.state().context.allowed_dirs, vec!["proj"]);
        assert_eq!(f.session.api.state().project_name, "My Project");
    }

    #[test]
    fn multi_word_values_are_kept_whole() {
        let mut f = fixture(None);
        drive(&mut f.session, "name My Project\ndir+ My Docs\n");
        assert_eq!(f.session.api.state().project_name, "My Project");
        assert_eq!(f.session.api.state().context.allowed_dirs, vec!["My Docs"]);
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_session() {
        let mut f = fixture(None);
        let mut input = Cursor::new(b"url+ \xff\xfe\ndir+ after\n".to_vec());
        let mut out = Vec::new();
        f.session.run_loop(&mut input, &mut out).unwrap();

        let ctx = &f.session.api.state().context;
        assert_eq!(ctx.urls, vec!["\u{fffd}\u{fffd}"]);
        assert_eq!(ctx.allowed_dirs, vec!["after"]);
    }

    #[test]
    fn repeated_add_warns() {
        let mut f = fixture(None);
        let out = drive(&mut f.session, "dir+ proj\ndir+ proj\n");
        assert!(out.contains("already in the allowed list"));
        assert_eq!(f.session.api.state().context.allowed_dirs.len(), 1);
    }

    #[test]
    fn prompt_then_update_then_prompt() {
        let mut f = fixture(None);
        let out = drive(&mut f.session, "dir+ proj\nprompt-first\n");
        assert!(out.contains("### File: proj/src/lib.rs"));

        let out = drive(&mut f.session, "update\nprompt\n");
        assert!(out.contains("Recorded 3 new"));
        assert!(!out.contains("### Updated File"));
    }

    #[test]
    fn unknown_input_goes_to_the_shell() {
        let mut f = fixture(None);
        let out = drive(&mut f.session, "ls -la\nmissing-tool\n");
        assert!(out.contains("ran ls -la"));
        assert!(out.contains("Error running command"));
        assert_eq!(*f.shell.ran.borrow(), vec!["ls -la", "missing-tool"]);
    }

    #[test]
    fn commands_never_reach_the_shell() {
        let mut f = fixture(None);
        drive(&mut f.session, "status\nhelp\n");
        assert!(f.shell.ran.borrow().is_empty());
    }

    #[test]
    fn parse_errors_are_reported() {
        let mut f = fixture(None);
        let out = drive(&mut f.session, "dir+ \"unterminated\n");
        assert!(out.contains("Could not parse input"));
        assert!(f.shell.ran.borrow().is_empty());
    }

    #[test]
    fn save_falls_back_to_configured_path() {
        let mut f = fixture(Some("default.json"));
        let out = drive(&mut f.session, "name demo\nsave\n\nname other\nload default.json\n");
        assert!(out.contains("Context successfully saved to default.json."));
        assert!(out.contains("Context successfully loaded from default.json."));
        assert_eq!(f.session.api.state().project_name, "demo");
    }

    #[test]
    fn save_without_any_path_warns() {
        let mut f = fixture(None);
        let out = drive(&mut f.session, "save\n\n");
        assert!(out.contains("No path entered."));
    }

    #[test]
    fn failed_load_keeps_going() {
        let mut f = fixture(None);
        let out = drive(&mut f.session, "dir+ proj\nload nowhere.json\nstatus\n");
        assert!(out.contains("Error loading context"));
        assert!(out.contains("---- proj"));
    }
}
