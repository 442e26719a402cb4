use thiserror::Error;

/// What part of GPU resource setup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupErrorKind {
    #[error("no usable OpenGL context")]
    Context,
    #[error("shader compilation failed")]
    ShaderCompile,
    #[error("program link failed")]
    ShaderLink,
    #[error("cannot read asset")]
    Io,
    #[error("cannot decode image")]
    ImageDecode,
    #[error("unsupported mesh")]
    UnsupportedMesh,
    #[error("cannot allocate GPU object")]
    GpuAllocation,
}

/// Failure while creating the window, the context or any GPU resource.
///
/// Setup either succeeds completely or returns one of these; there is no
/// partially initialized demo.
#[derive(Debug, Error)]
#[error("{kind}: {detail}")]
pub struct SetupError {
    kind: SetupErrorKind,
    detail: String,
}

impl SetupError {
    pub fn new(kind: SetupErrorKind, detail: impl Into<String>) -> Self {
        SetupError {
            kind,
            detail: detail.into(),
        }
    }

    pub fn context(detail: impl Into<String>) -> Self {
        Self::new(SetupErrorKind::Context, detail)
    }

    pub fn unsupported_mesh(detail: impl Into<String>) -> Self {
        Self::new(SetupErrorKind::UnsupportedMesh, detail)
    }

    pub fn kind(&self) -> SetupErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<std::io::Error> for SetupError {
    fn from(err: std::io::Error) -> Self {
        SetupError::new(SetupErrorKind::Io, err.to_string())
    }
}

impl From<tobj::LoadError> for SetupError {
    fn from(err: tobj::LoadError) -> Self {
        SetupError::unsupported_mesh(err.to_string())
    }
}

/// glow reports allocation failures as bare strings.
pub(crate) fn gpu_alloc(what: &str) -> impl FnOnce(String) -> SetupError + '_ {
    move |err| SetupError::new(SetupErrorKind::GpuAllocation, format!("{what}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_detail() {
        let err = SetupError::unsupported_mesh("asset has 2 meshes");
        assert_eq!(err.to_string(), "unsupported mesh: asset has 2 meshes");
        assert_eq!(err.kind(), SetupErrorKind::UnsupportedMesh);
    }

    #[test]
    fn io_errors_keep_their_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "tunnel.vert");
        let err = SetupError::from(io);
        assert_eq!(err.kind(), SetupErrorKind::Io);
        assert_eq!(err.detail(), "tunnel.vert");
    }

    #[test]
    fn gpu_alloc_prefixes_the_object() {
        let err = gpu_alloc("vertex array")("out of names".to_string());
        assert_eq!(err.kind(), SetupErrorKind::GpuAllocation);
        assert_eq!(err.detail(), "vertex array: out of names");
    }
}
