use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AcdatResult<T> = Result<T, AcdatError>;
pub type ParserResult<T> = AcdatResult<T>;
pub type ExportResult<T> = AcdatResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcdatErrorCategory {
    Success,
    InputValidation,
    EncodingUndetermined,
    MalformedRecord,
    IoSystemError,
    InternalError,
}

impl AcdatErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InputValidation => 1,
            Self::EncodingUndetermined => 2,
            Self::MalformedRecord => 3,
            Self::IoSystemError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InputValidation => "InputValidation",
            Self::EncodingUndetermined => "EncodingUndetermined",
            Self::MalformedRecord => "MalformedRecord",
            Self::IoSystemError => "IoSystemError",
            Self::InternalError => "InternalError",
        }
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

impl Display for AcdatErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcdatError {
    category: AcdatErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl AcdatError {
    pub fn new(
        category: AcdatErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(AcdatErrorCategory::InputValidation, placeholder, message)
    }

    pub fn encoding_undetermined(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            AcdatErrorCategory::EncodingUndetermined,
            placeholder,
            message,
        )
    }

    pub fn malformed_record(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(AcdatErrorCategory::MalformedRecord, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(AcdatErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(AcdatErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> AcdatErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    /// Prefixes the message with the input it concerns, keeping category and placeholder.
    pub fn with_source_name(self, source_name: &str) -> Self {
        Self {
            message: format!("{}: {}", source_name, self.message),
            ..self
        }
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl Display for AcdatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category, self.placeholder, self.message
        )
    }
}

impl Error for AcdatError {}
