use crate::{
    cli::{Args, OutputFormat},
    config::ChainFile,
    constants::STDIN_INDICATOR,
    error::{Error, Result},
    ioutils::{parse_string_to_json, read_from},
    prompt::{ConsoleTerminal, Prompt, ResultContext, Terminal},
};
use serde_json::{Map, Value};
use std::io::{Read, Write};

/// Main CLI runner: loads a chain file, asks it and prints the answers
pub struct Runner {
    args: Args,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Runs the chain on the process's terminal and prints to stdout.
    pub fn run(self) -> Result<()> {
        let seeded = self.seeded_answers(std::io::stdin())?;
        let stdout = std::io::stdout();
        self.ask_and_print(seeded, ConsoleTerminal::new(), stdout.lock())
    }

    /// Runs the chain against any terminal, printing the answers to `out`.
    /// `stdin` is only read when answers are passed as `-`.
    ///
    /// Failures of the chain itself come back as [`Error::Reported`], since
    /// the terminal has shown them already.
    pub fn run_with<T, W, R>(self, terminal: T, out: W, stdin: R) -> Result<()>
    where
        T: Terminal,
        W: Write,
        R: Read,
    {
        let seeded = self.seeded_answers(stdin)?;
        self.ask_and_print(seeded, terminal, out)
    }

    fn ask_and_print<T: Terminal, W: Write>(
        &self,
        seeded: Map<String, Value>,
        terminal: T,
        mut out: W,
    ) -> Result<()> {
        let chain = ChainFile::load(&self.args.chain_file)?;
        let mut prompt = build_prompt(chain, seeded, terminal)?;

        let outcome = prompt.run().map(|context| render(context, self.args.format));
        prompt.done();

        let rendered = outcome.map_err(Error::reported)??;
        writeln!(out, "{rendered}")?;
        out.flush()?;
        Ok(())
    }

    /// Answers passed on the command line, or read from stdin for `-`
    fn seeded_answers<R: Read>(&self, stdin: R) -> Result<Map<String, Value>> {
        let Some(answers_arg) = &self.args.answers else {
            return Ok(Map::new());
        };
        let buf = if answers_arg == STDIN_INDICATOR {
            read_from(stdin)?
        } else {
            answers_arg.clone()
        };
        let answers = parse_string_to_json(&buf)?;
        log::debug!("Seeded {} answer(s) from the command line", answers.len());
        Ok(answers)
    }
}

/// Queues the chain's questions, skipping those whose key was answered up front.
fn build_prompt<T: Terminal>(
    chain: ChainFile,
    seeded: Map<String, Value>,
    terminal: T,
) -> Result<Prompt<T>> {
    let (mut context, questions) = chain.into_parts();
    let answered: Vec<String> = seeded.keys().cloned().collect();
    for (key, value) in seeded {
        context.insert(key, value);
    }

    let mut prompt = Prompt::new(terminal).with_context(context);
    for question in questions {
        if let Some(key) = question.storage_key() {
            if answered.iter().any(|answered| answered == key) {
                log::info!("Skipping '{key}', already answered");
                continue;
            }
        }
        prompt.ask(question)?;
    }
    Ok(prompt)
}

fn render(context: &ResultContext, format: OutputFormat) -> Result<String> {
    let value = context.to_value();
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&value)?,
        OutputFormat::Yaml => serde_yaml::to_string(&value)?.trim_end().to_string(),
    };
    Ok(rendered)
}

/// Main entry point for CLI execution
pub fn run(args: Args) -> Result<()> {
    let runner = Runner::new(args);
    runner.run()
}
