use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum HttpError {
    // line error
    MalformedLine,

    LineTooLong,

    // head error
    StartLine,

    Method,

    Version,

    Header,

    // body error
    InvalidContentLength,

    ChunkFormat,

    // uri error
    PercentEncoding,
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use HttpError::*;
        match self {
            MalformedLine => write!(f, "Malformed or unterminated line"),
            LineTooLong => write!(f, "Line exceeds the length limit"),

            StartLine => write!(f, "Illegal start line"),
            Method => write!(f, "Unknown http method"),
            Version => write!(f, "Illegal http version"),
            Header => write!(f, "Illegal header line"),

            InvalidContentLength => write!(f, "Illegal content-length value"),
            ChunkFormat => write!(f, "Illegal chunked encoding"),

            PercentEncoding => write!(f, "Illegal percent encoding"),
        }
    }
}

// use default impl
impl std::error::Error for HttpError {}
