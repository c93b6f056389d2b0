use serde::Serialize;
use xsem_codec::{Command, CramErrorCode, ReplyFields};

use crate::attributes::{CramAttributes, NpiAttributes};

/// Reply words 1..=4 of one command, in wire order.
///
/// Commands that only document an acknowledgment id and a status leave
/// `resp_msg3` and `resp_msg4` at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IpiResponse {
    pub resp_msg1: u32,
    pub resp_msg2: u32,
    pub resp_msg3: u32,
    pub resp_msg4: u32,
}

impl IpiResponse {
    pub(crate) fn ack(fields: &ReplyFields) -> Self {
        Self {
            resp_msg1: fields.ack_id,
            resp_msg2: fields.data[0],
            ..Self::default()
        }
    }

    pub(crate) fn full(fields: &ReplyFields) -> Self {
        Self {
            resp_msg1: fields.ack_id,
            resp_msg2: fields.data[0],
            resp_msg3: fields.data[1],
            resp_msg4: fields.data[2],
        }
    }

    /// Acknowledgment id echoed by the server.
    pub fn ack_id(&self) -> u32 {
        self.resp_msg1
    }

    /// Primary status of the remote operation; zero means accepted.
    pub fn status(&self) -> u32 {
        self.resp_msg2
    }

    pub fn is_accepted(&self) -> bool {
        self.status() == 0
    }

    /// Primary status read as a CRAM error code.
    pub fn cram_error(&self) -> Option<CramErrorCode> {
        CramErrorCode::from_code(self.status())
    }

    /// Command named by the acknowledgment id.
    pub fn command(&self) -> Option<Command> {
        Command::from_header(self.ack_id())
    }
}

/// ECC of one CRAM frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameEcc {
    pub ack_id: u32,
    pub segment0: u32,
    pub segment1: u32,
    pub status: u32,
}

impl FrameEcc {
    pub fn is_accepted(&self) -> bool {
        self.status == 0
    }

    /// The same reply as raw response words.
    pub fn response(&self) -> IpiResponse {
        IpiResponse {
            resp_msg1: self.ack_id,
            resp_msg2: self.segment0,
            resp_msg3: self.segment1,
            resp_msg4: self.status,
        }
    }
}

impl From<IpiResponse> for FrameEcc {
    fn from(resp: IpiResponse) -> Self {
        Self {
            ack_id: resp.resp_msg1,
            segment0: resp.resp_msg2,
            segment1: resp.resp_msg3,
            status: resp.resp_msg4,
        }
    }
}

/// CRAM and NPI configuration as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SemConfig {
    pub ack_id: u32,
    pub cram: CramAttributes,
    pub npi: NpiAttributes,
    pub status: u32,
}

impl SemConfig {
    pub fn is_accepted(&self) -> bool {
        self.status == 0
    }

    /// The same reply as raw response words.
    pub fn response(&self) -> IpiResponse {
        IpiResponse {
            resp_msg1: self.ack_id,
            resp_msg2: self.cram.raw(),
            resp_msg3: self.npi.raw(),
            resp_msg4: self.status,
        }
    }
}

impl From<IpiResponse> for SemConfig {
    fn from(resp: IpiResponse) -> Self {
        Self {
            ack_id: resp.resp_msg1,
            cram: CramAttributes(resp.resp_msg2),
            npi: NpiAttributes(resp.resp_msg3),
            status: resp.resp_msg4,
        }
    }
}
