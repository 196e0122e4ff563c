//! Question queue and the state machine that drives it
//!
//! Questions are queued with [`Prompt::ask`] and answered strictly in
//! submission order by [`Prompt::run`]. Each answer can be stored in the
//! [`ResultContext`], transformed by `before`, and followed up by `after`
//! (or `if_true` / `if_false` for boolean questions). Hooks and
//! continuations get a [`Scope`], which lets them read and change the
//! context and ask nested questions on the same terminal session.

use super::{
    question::Question,
    session::{ChainState, Session},
    terminal::{ReadOutcome, Terminal},
    ResultContext,
};
use crate::{
    constants::DEFAULT_SUFFIX,
    error::{Error, Result},
};
use serde_json::Value;
use std::{collections::VecDeque, fmt};

type BuildQuestion = Box<dyn FnOnce(&ResultContext) -> Question>;
type Continuation = Box<dyn FnOnce(&mut Scope<'_, '_>) -> Result<()>>;

enum Step {
    Ask(BuildQuestion),
    Then(Continuation),
}

/// What a hook or continuation can reach while the chain is running
pub struct Scope<'s, 't> {
    context: &'s mut ResultContext,
    session: &'s mut Session<'t>,
}

impl<'s, 't> Scope<'s, 't> {
    pub fn context(&self) -> &ResultContext {
        &*self.context
    }

    pub fn context_mut(&mut self) -> &mut ResultContext {
        &mut *self.context
    }

    /// Asks a nested question on the current session and waits for its answer.
    pub fn ask(&mut self, question: Question) -> Result<Value> {
        answer(self.session, self.context, question)
    }

    /// Prints a plain line to the terminal.
    pub fn say(&mut self, text: &str) -> Result<()> {
        self.session.say(text)
    }
}

/// Runs one question to completion: render, read, validate, retry, store, hooks.
fn answer(
    session: &mut Session<'_>,
    context: &mut ResultContext,
    question: Question,
) -> Result<Value> {
    let text = question.prompt_text(context)?;
    let suffix = question.suffix_or(session.default_suffix()).to_string();
    let kind = question.value_kind();
    let default = question.default_value().filter(|_| kind.shows_default());
    let mut budget = question.tries_left();

    session.transition(ChainState::Questioning);
    let value = loop {
        if !kind.choices().is_empty() {
            session.render_choices(kind.choices())?;
        }
        session.render_prompt(&text, default, &suffix)?;

        let line = match session.read_answer(kind.is_secret())? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted => {
                session.transition(ChainState::Interrupted);
                return Err(Error::Interrupted);
            }
        };

        match question.evaluate(&line, context) {
            Ok(value) => break value,
            Err(rejection) => {
                let message = question.failure_message();
                if budget.take() {
                    log::debug!("Rejected answer for '{text}', retries left: {budget:?}");
                    session.transition(ChainState::Retrying);
                    session.warn(&rejection.warning(&message))?;
                    session.transition(ChainState::Questioning);
                    continue;
                }
                log::debug!("Rejected answer for '{text}' with no retries left");
                session.transition(ChainState::Failed);
                return Err(rejection.into_error(message));
            }
        }
    };

    let mut scope = Scope { context, session };
    let value = match question.before_hook() {
        Some(before) => before(value, &mut scope)?,
        None => value,
    };

    if let Some(key) = question.storage_key() {
        log::debug!("Storing answer under '{key}'");
        scope.context.insert(key, value.clone());
    }
    scope.context.record(value.clone());
    scope.session.transition(ChainState::Answered);

    if let Some(after) = question.after_hook(&value) {
        after(&value, &mut scope)?;
    }

    Ok(value)
}

/// An interactive prompt chain
///
/// ```
/// use askchain::prompt::{Prompt, Question, ScriptedTerminal};
///
/// let mut prompt = Prompt::new(ScriptedTerminal::new([""]));
/// prompt.ask(Question::new("Name:").key("name").default("Bob")).unwrap();
/// let context = prompt.run().unwrap();
/// assert_eq!(context.get_str("name"), Some("Bob"));
/// ```
pub struct Prompt<T: Terminal> {
    terminal: Option<T>,
    context: ResultContext,
    queue: VecDeque<Step>,
    suffix: String,
    state: ChainState,
}

impl<T: Terminal> Prompt<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal: Some(terminal),
            context: ResultContext::new(),
            queue: VecDeque::new(),
            suffix: DEFAULT_SUFFIX.to_string(),
            state: ChainState::Idle,
        }
    }

    /// Starts the chain with values already in the context.
    pub fn with_context(mut self, context: ResultContext) -> Self {
        self.context = context;
        self
    }

    /// Suffix used by questions that do not set their own.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn context(&self) -> &ResultContext {
        &self.context
    }

    pub fn into_context(self) -> ResultContext {
        self.context
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_terminal()
    }

    /// Number of queued questions and continuations not yet run.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn check_closed(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ChainClosed);
        }
        Ok(())
    }

    /// Queues a question.
    pub fn ask(&mut self, question: Question) -> Result<&mut Self> {
        self.check_closed()?;
        if !question.has_prompt() {
            return Err(Error::NoQuestionGiven);
        }
        self.queue.push_back(Step::Ask(Box::new(move |_: &ResultContext| question)));
        Ok(self)
    }

    /// Queues a question built from the context right before it is shown.
    pub fn ask_with<F>(&mut self, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&ResultContext) -> Question + 'static,
    {
        self.check_closed()?;
        self.queue.push_back(Step::Ask(Box::new(build)));
        Ok(self)
    }

    /// Queues a continuation that runs between questions.
    pub fn then<F>(&mut self, continuation: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Scope<'_, '_>) -> Result<()> + 'static,
    {
        self.check_closed()?;
        self.queue.push_back(Step::Then(Box::new(continuation)));
        Ok(self)
    }

    /// Answers every queued question in order.
    ///
    /// On failure the error has already been printed to the terminal, the
    /// rest of the queue is discarded and the chain is closed.
    pub fn run(&mut self) -> Result<&ResultContext> {
        self.check_closed()?;
        let terminal = self.terminal.as_mut().ok_or(Error::ChainClosed)?;

        let outcome = {
            let mut session = Session::open(terminal, &self.suffix);
            let outcome = drive(&mut session, &mut self.context, &mut self.queue);
            if let Err(err) = &outcome {
                report(&mut session, err);
            }
            outcome
        };

        match outcome {
            Ok(()) => {
                self.state = ChainState::Idle;
                Ok(&self.context)
            }
            Err(err) => {
                self.queue.clear();
                self.terminal = None;
                self.state = match err {
                    Error::Interrupted => ChainState::Interrupted,
                    _ => ChainState::Failed,
                };
                log::debug!("Chain ended in state {:?}: {err}", self.state);
                Err(err)
            }
        }
    }

    /// Releases the terminal and closes the chain. Calling it again is a no-op.
    pub fn done(&mut self) {
        if self.terminal.take().is_some() {
            log::debug!("Prompt chain closed");
        }
        self.queue.clear();
        self.state = ChainState::Closed;
    }
}

fn drive(
    session: &mut Session<'_>,
    context: &mut ResultContext,
    queue: &mut VecDeque<Step>,
) -> Result<()> {
    while let Some(step) = queue.pop_front() {
        match step {
            Step::Ask(build) => {
                let question = build(&*context);
                answer(session, context, question)?;
            }
            Step::Then(continuation) => {
                let mut scope = Scope { context: &mut *context, session: &mut *session };
                continuation(&mut scope)?;
            }
        }
    }
    session.transition(ChainState::Idle);
    Ok(())
}

fn report(session: &mut Session<'_>, err: &Error) {
    let written = match err {
        Error::Interrupted => session.say(""),
        _ => session.error(&err.to_string()),
    };
    if let Err(e) = written {
        log::warn!("Failed to report error to the terminal: {e}");
    }
}

impl<T: Terminal> fmt::Debug for Prompt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("state", &self.state)
            .field("pending", &self.queue.len())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
