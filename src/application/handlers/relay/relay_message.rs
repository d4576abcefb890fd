//! RelayMessage command handler.
//!
//! Validates one inbound chat message, forwards it to the upstream
//! chat-completion API with the coaching persona, and maps the outcome to a
//! normalized result. Every path returns a value; nothing the provider does
//! escapes as anything other than a `RelayError`.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::config::AiConfig;
use crate::domain::chat::EMPTY_REPLY_PLACEHOLDER;
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole};

/// Persona instruction sent as the system message on every call.
pub const COACH_SYSTEM_PROMPT: &str = "당신은 \"핏코치 민트(PitCoach Mint)\"입니다.
친근하고 전문적인 개인 맞춤 운동 코치 역할을 수행합니다.
사용자의 운동 목표, 현재 체력 수준, 건강 상태, 생활 습관을 고려하여
단계별 운동 루틴, 스트레칭, 근력/유산소 운동, 회복 가이드 등을 추천합니다.
최신 연구와 데이터 기반 권장 사항을 참고하며, 친절하게 동기 부여와 격려를 제공합니다.
사용자가 입력한 컨디션, 통증, 수면 정보 등을 반영하여 실시간 맞춤형 피드백을 제공합니다.
대화 톤은 항상 친근하고 동기부여적이며, 단계별 안내가 명확해야 합니다.";

/// Fixed parameters of every upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaySettings {
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            system_prompt: COACH_SYSTEM_PROMPT.to_string(),
            max_tokens: 1500,
            temperature: 0.7,
        }
    }
}

impl From<&AiConfig> for RelaySettings {
    fn from(config: &AiConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            ..Self::default()
        }
    }
}

/// Command carrying the inbound message, which may be absent.
#[derive(Debug, Clone, Default)]
pub struct RelayMessageCommand {
    pub message: Option<String>,
}

impl RelayMessageCommand {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// Successful relay result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessageResult {
    /// Assistant text, or the placeholder when the upstream returned none.
    pub message: String,
}

/// Relay failures. The display text is what the caller receives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Message absent or empty.
    #[error("메시지가 필요합니다.")]
    Validation,

    /// Upstream credential not configured.
    #[error("OpenAI API 키가 설정되지 않았습니다.")]
    Configuration,

    /// Upstream answered with a non-success status.
    #[error("OpenAI API 오류: {status}")]
    Upstream { status: u16 },

    /// Network failure, undecodable upstream body, or anything else unexpected.
    #[error("서버 오류가 발생했습니다.")]
    Internal,
}

impl RelayError {
    /// HTTP status the error is surfaced with.
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::Validation => 400,
            RelayError::Configuration | RelayError::Internal => 500,
            RelayError::Upstream { status } => *status,
        }
    }
}

/// Handler for RelayMessage commands.
///
/// Stateless apart from its configuration; safe to share across requests.
pub struct RelayMessageHandler {
    provider: Option<Arc<dyn AIProvider>>,
    settings: RelaySettings,
}

impl RelayMessageHandler {
    /// Creates a handler. `provider` is `None` when no credential is configured.
    pub fn new(provider: Option<Arc<dyn AIProvider>>, settings: RelaySettings) -> Self {
        Self { provider, settings }
    }

    /// Returns the fixed call parameters.
    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Handles a relay command with a single upstream attempt.
    pub async fn handle(&self, cmd: RelayMessageCommand) -> Result<RelayMessageResult, RelayError> {
        let message = match cmd.message {
            Some(message) if !message.is_empty() => message,
            _ => {
                tracing::debug!("rejecting relay request without message");
                return Err(RelayError::Validation);
            }
        };

        let Some(provider) = self.provider.as_ref() else {
            tracing::error!("upstream API key is not configured");
            return Err(RelayError::Configuration);
        };

        let trace_id = Uuid::new_v4().to_string();
        let request = CompletionRequest::new(trace_id.clone())
            .with_system_prompt(self.settings.system_prompt.clone())
            .with_message(MessageRole::User, message)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);

        match provider.complete(request).await {
            Ok(completion) => {
                tracing::debug!(
                    trace_id = %trace_id,
                    model = %completion.model,
                    reply_chars = completion.content.chars().count(),
                    total_tokens = completion.usage.total_tokens,
                    "relayed completion"
                );
                let message = if completion.content.is_empty() {
                    EMPTY_REPLY_PLACEHOLDER.to_string()
                } else {
                    completion.content
                };
                Ok(RelayMessageResult { message })
            }
            Err(AIError::UpstreamStatus { status, body }) => {
                tracing::error!(trace_id = %trace_id, status, body = %body, "OpenAI API error");
                Err(RelayError::Upstream { status })
            }
            Err(err) => {
                tracing::error!(trace_id = %trace_id, error = %err, "relay call failed");
                Err(RelayError::Internal)
            }
        }
    }
}
