use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum FrameError {
    IllegalFin,

    IllegalOpCode,

    NotEnoughData,

    NotEnoughCapacity,

    // stream ended inside a frame
    Truncated,

    TooLarge,

    ControlTooLong,
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use FrameError::*;
        match self {
            IllegalFin => write!(f, "Illegal fin or reserved bits"),
            IllegalOpCode => write!(f, "Illegal opcode value"),
            NotEnoughData => write!(f, "Not enough data to parse"),
            NotEnoughCapacity => write!(f, "Not enough space to write to"),
            Truncated => write!(f, "Stream ended inside a frame"),
            TooLarge => write!(f, "Payload exceeds the size limit"),
            ControlTooLong => write!(f, "Control frame payload longer than 125 bytes"),
        }
    }
}

// use default impl
impl std::error::Error for FrameError {}
