//! Turn failures and the user-facing text synthesized for them.
//!
//! A failed turn still produces exactly one assistant-role message. The text
//! of that message is derived here, by matching the failure exhaustively:
//! an HTTP failure is classified by status, a transport failure by kind.

use thiserror::Error;

/// Substituted when a successful reply carries no text.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "응답을 생성할 수 없습니다.";

/// Marker in a 500 detail meaning the upstream credential is not configured.
pub const MISSING_CREDENTIAL_PHRASE: &str = "API 키가 설정되지 않았습니다";

/// HTTP status codes the relay is known to return, plus everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpStatusClass {
    BadRequest,
    Unauthorized,
    Forbidden,
    TooManyRequests,
    InternalServerError,
    ServiceUnavailable,
    Other(u16),
}

impl From<u16> for HttpStatusClass {
    fn from(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            429 => Self::TooManyRequests,
            500 => Self::InternalServerError,
            503 => Self::ServiceUnavailable,
            other => Self::Other(other),
        }
    }
}

/// A failure that happened before any HTTP response was available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// The relay could not be reached.
    #[error("connectivity failure: {0}")]
    Connectivity(String),

    /// A response arrived but its body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Anything else; carries a description when one is available.
    #[error("unexpected failure: {}", .0.as_deref().unwrap_or("unknown"))]
    Other(Option<String>),
}

/// Why a turn did not produce a relayed reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnFailure {
    /// The relay answered with a non-success status.
    #[error("relay returned HTTP {status}")]
    Http {
        status: u16,
        /// Human-readable `error` text from the response body, if any.
        detail: Option<String>,
    },

    #[error(transparent)]
    Transport(#[from] TransportFailure),
}

impl TurnFailure {
    /// Creates an HTTP failure.
    pub fn http(status: u16, detail: Option<String>) -> Self {
        Self::Http {
            status,
            detail: detail.filter(|d| !d.trim().is_empty()),
        }
    }

    /// Text shown to the user in place of a reply.
    pub fn user_message(&self) -> String {
        match self {
            TurnFailure::Http { status, detail } => {
                let headline = status_headline(*status, detail.as_deref());
                match detail {
                    Some(detail) => format!("{headline}\n\n상세: {detail}"),
                    None => headline,
                }
            }
            TurnFailure::Transport(failure) => transport_message(failure),
        }
    }
}

fn status_headline(status: u16, detail: Option<&str>) -> String {
    match HttpStatusClass::from(status) {
        HttpStatusClass::BadRequest => "잘못된 요청입니다. 입력 내용을 확인해주세요.".to_string(),
        HttpStatusClass::Unauthorized => "API 키가 유효하지 않습니다.".to_string(),
        HttpStatusClass::Forbidden => "접근이 거부되었습니다.".to_string(),
        HttpStatusClass::TooManyRequests => {
            "요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요.".to_string()
        }
        HttpStatusClass::InternalServerError
            if detail.is_some_and(|d| d.contains(MISSING_CREDENTIAL_PHRASE)) =>
        {
            "OpenAI API 키가 설정되지 않았습니다. 서버의 환경변수(OPENAI_API_KEY)를 확인해주세요."
                .to_string()
        }
        HttpStatusClass::InternalServerError => {
            "서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요.".to_string()
        }
        HttpStatusClass::ServiceUnavailable => {
            "AI 서비스를 일시적으로 사용할 수 없습니다.".to_string()
        }
        HttpStatusClass::Other(code) => format!("알 수 없는 오류가 발생했습니다. (상태 코드: {code})"),
    }
}

fn transport_message(failure: &TransportFailure) -> String {
    match failure {
        TransportFailure::Connectivity(_) => {
            "네트워크 연결을 확인하거나 서버가 실행 중인지 확인해주세요.".to_string()
        }
        TransportFailure::MalformedResponse(_) => {
            "서버 응답 형식이 올바르지 않습니다.".to_string()
        }
        TransportFailure::Other(Some(description)) => {
            format!("예상치 못한 오류가 발생했습니다: {description}")
        }
        TransportFailure::Other(None) => "예상치 못한 오류가 발생했습니다.".to_string(),
    }
}
