use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::classifier::HeartRateClassifier;
use crate::error::InvalidInputError;
use crate::evaluator::Evaluator;
use crate::models::{Evaluation, Readings};
use crate::score::strip_heart_rate_unit;

const DISPLAY_CAPACITY: usize = 64;

/// Latest readings, fed by input events and read at tap time.
#[derive(Debug, Default)]
pub struct InputCache {
    readings: Readings,
}

impl InputCache {
    pub fn record_heart_rate(&mut self, raw: impl Into<String>) {
        self.readings.heart_rate = Some(raw.into());
    }

    pub fn record_calorie_burn(&mut self, raw: Option<String>) {
        self.readings.calorie_burn = raw.filter(|value| !value.trim().is_empty());
    }

    pub fn snapshot(&self) -> Readings {
        self.readings.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    HeartRate(String),
    Calories(Option<String>),
    Tap,
    Quit,
}

impl SessionEvent {
    /// Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, InvalidInputError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (command, value) = match line.split_once(char::is_whitespace) {
            Some((command, value)) => (command, Some(value.trim().to_string())),
            None => (line, None),
        };

        let event = match (command, value) {
            ("heart-rate", Some(value)) => SessionEvent::HeartRate(value),
            ("calories", value) => SessionEvent::Calories(value),
            ("tap", None) => SessionEvent::Tap,
            ("quit", None) => SessionEvent::Quit,
            _ => return Err(InvalidInputError::new("session event", line)),
        };

        Ok(Some(event))
    }
}

/// Tap-driven evaluations writing into one shared display.
///
/// Every display change is published in order. Taps are independent, so
/// whichever evaluation finishes last leaves the final text.
pub struct Session<C> {
    cache: InputCache,
    evaluator: Arc<Evaluator<C>>,
    display: broadcast::Sender<String>,
}

impl<C: HeartRateClassifier + 'static> Session<C> {
    pub fn new(evaluator: Evaluator<C>) -> Self {
        let (display, _) = broadcast::channel(DISPLAY_CAPACITY);
        Self {
            cache: InputCache::default(),
            evaluator: Arc::new(evaluator),
            display,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.display.subscribe()
    }

    /// Shows the stripped heart rate right away, then the verdict once the check returns.
    pub fn tap(&self) -> JoinHandle<Evaluation> {
        let Readings {
            heart_rate,
            calorie_burn,
        } = self.cache.snapshot();
        let heart_rate = heart_rate.unwrap_or_default();
        show(&self.display, strip_heart_rate_unit(&heart_rate));

        let evaluator = Arc::clone(&self.evaluator);
        let display = self.display.clone();

        tokio::spawn(async move {
            let evaluation = evaluator
                .evaluate(&heart_rate, calorie_burn.as_deref())
                .await;
            show(&display, evaluation.message.clone());
            evaluation
        })
    }

    pub fn apply(&mut self, event: SessionEvent) -> Option<JoinHandle<Evaluation>> {
        debug!(?event, "session event");
        match event {
            SessionEvent::HeartRate(raw) => self.cache.record_heart_rate(raw),
            SessionEvent::Calories(raw) => self.cache.record_calorie_burn(raw),
            SessionEvent::Tap => return Some(self.tap()),
            SessionEvent::Quit => {}
        }
        None
    }

    /// Consume events until `quit` or end of input, then wait for every tap.
    pub async fn run<R>(mut self, input: R) -> anyhow::Result<Vec<Evaluation>>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut pending = Vec::new();

        while let Some(line) = lines.next_line().await.context("failed to read session input")? {
            match SessionEvent::parse(&line) {
                Ok(Some(SessionEvent::Quit)) => break,
                Ok(Some(event)) => pending.extend(self.apply(event)),
                Ok(None) => {}
                Err(err) => warn!("{err}"),
            }
        }

        let mut evaluations = Vec::with_capacity(pending.len());
        for handle in pending {
            evaluations.push(handle.await.context("evaluation task failed")?);
        }
        Ok(evaluations)
    }
}

fn show(display: &broadcast::Sender<String>, text: String) {
    // No subscribers is fine; the text simply goes unseen.
    let _ = display.send(text);
}
