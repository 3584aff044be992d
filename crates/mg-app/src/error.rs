use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported image '{0}': upload a PNG or JPEG file")]
    UnsupportedImage(String),

    #[error("Error from generator: {0}")]
    GeneratorError(String),

    #[error("Generation worker stopped unexpectedly")]
    WorkerGone,

    #[error("API key is missing. Please set {0} in your environment or .env file")]
    MissingApiKey(&'static str),
}
