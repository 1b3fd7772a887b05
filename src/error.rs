#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Settings file failed to parse.
    Parse(ron::error::SpannedError),
    /// Settings failed to serialize.
    Encode(ron::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self { Self::Io(err) }
}

impl From<ron::error::SpannedError> for Error {
    fn from(err: ron::error::SpannedError) -> Self { Self::Parse(err) }
}

impl From<ron::Error> for Error {
    fn from(err: ron::Error) -> Self { Self::Encode(err) }
}
