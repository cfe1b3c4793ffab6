//! Per-tick frame logging.
//!
//! A [`FrameRecord`] is the externally visible state after one tick:
//! committed positions and steps, coupling counts and the spring list.
//! [`FrameRecorder`] appends records to any writer as JSON lines.

use std::io::{self, Write};

use biocrowds_core::{Agent, AgentId, Crowd, TickId, Vec3};
use biocrowds_springs::{PairKey, SpringNetwork};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors writing frame records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The underlying writer failed.
    #[error("frame record I/O: {0}")]
    Io(#[from] io::Error),
    /// A record could not be serialised.
    #[error("frame record encoding: {0}")]
    Json(#[from] serde_json::Error),
}

/// One agent's committed state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentFrame {
    /// Agent id.
    pub id: AgentId,
    /// Committed position.
    pub position: Vec3,
    /// Step applied this tick.
    pub step: Vec3,
    /// Current sub-goal.
    pub sub_goal: Vec3,
    /// Live springs attached to the agent.
    pub couplings: u32,
}

impl From<&Agent> for AgentFrame {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            position: agent.position,
            step: agent.step,
            sub_goal: agent.goal.sub_goal,
            couplings: agent.coupling.current,
        }
    }
}

/// Committed state after one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Tick the state belongs to.
    pub tick: TickId,
    /// Agents in spawn order.
    pub agents: Vec<AgentFrame>,
    /// Live springs in network order.
    pub springs: Vec<PairKey>,
}

impl FrameRecord {
    /// Capture `crowd` and `network` at `tick`.
    pub fn capture(tick: TickId, crowd: &Crowd, network: &SpringNetwork) -> Self {
        Self {
            tick,
            agents: crowd.iter().map(AgentFrame::from).collect(),
            springs: network.springs().keys().copied().collect(),
        }
    }
}

/// Writes [`FrameRecord`]s as newline-delimited JSON.
#[derive(Debug)]
pub struct FrameRecorder<W: Write> {
    writer: W,
    frames: u64,
}

impl<W: Write> FrameRecorder<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, frames: 0 }
    }

    /// Append one record followed by a newline.
    pub fn record(&mut self, frame: &FrameRecord) -> Result<(), RecordError> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.frames += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Flush the writer.
    pub fn flush(&mut self) -> Result<(), RecordError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
