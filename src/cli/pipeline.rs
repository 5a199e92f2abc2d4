//! Sequential, fail-fast execution of flow steps
//!
//! Each step is awaited to completion before the next one starts. The first
//! failing step ends the flow; steps already completed are not undone.

use std::future::Future;

use crate::error::Result;

#[derive(Debug)]
pub struct Pipeline {
    flow: &'static str,
    completed: Vec<&'static str>,
}

impl Pipeline {
    pub fn new(flow: &'static str) -> Self {
        tracing::debug!(flow, "flow started");
        Pipeline {
            flow,
            completed: Vec::new(),
        }
    }

    /// Run one step and record it when it succeeds
    pub async fn step<T, F>(&mut self, name: &'static str, step: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tracing::debug!(flow = self.flow, step = name, "step started");
        match step.await {
            Ok(value) => {
                tracing::debug!(flow = self.flow, step = name, "step succeeded");
                self.completed.push(name);
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(
                    flow = self.flow,
                    step = name,
                    completed = ?self.completed,
                    error = %e,
                    "step failed, aborting flow"
                );
                Err(e)
            }
        }
    }

    /// Run a step that needs no suspension
    pub fn check<T>(&mut self, name: &'static str, step: impl FnOnce() -> Result<T>) -> Result<T> {
        tracing::debug!(flow = self.flow, step = name, "step started");
        match step() {
            Ok(value) => {
                self.completed.push(name);
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(
                    flow = self.flow,
                    step = name,
                    completed = ?self.completed,
                    error = %e,
                    "step failed, aborting flow"
                );
                Err(e)
            }
        }
    }

    pub fn flow(&self) -> &'static str {
        self.flow
    }

    /// Steps that succeeded so far, in order
    pub fn completed(&self) -> &[&'static str] {
        &self.completed
    }

    pub fn finish(self) -> Vec<&'static str> {
        tracing::debug!(flow = self.flow, steps = self.completed.len(), "flow finished");
        self.completed
    }
}
