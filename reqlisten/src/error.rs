use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] reqline::Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),
}
