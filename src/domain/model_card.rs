//! Model card - static descriptor of the coaching agent.
//!
//! Purely declarative. Field order is fixed by the struct layout so the
//! serialized form is identical on every request.

use serde::Serialize;

/// Placeholder evaluation metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelMetrics {
    pub accuracy: String,
    pub f1_score: String,
}

/// Public descriptor served by the metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCard {
    pub model_name: String,
    pub version: String,
    pub description: String,
    pub input_type: String,
    pub output_type: String,
    pub metrics: ModelMetrics,
    pub limitations: Vec<String>,
    pub contact: String,
    pub api_endpoint: String,
    pub api_method: String,
}

impl ModelCard {
    /// Builds the PitCoach Mint card, pointing at the relay under `base_url`.
    pub fn pitcoach_mint(base_url: &str) -> Self {
        Self {
            model_name: "my-first-mcp-agent".to_string(),
            version: "v1.0".to_string(),
            description: concat!(
                "핏코치 민트(PitCoach Mint)는 개인 맞춤 운동 및 건강 코칭을 제공하는 AI 에이전트입니다. ",
                "사용자의 운동 목표, 체력 수준, 건강 상태, 생활 습관을 고려하여 단계별 운동 루틴, ",
                "스트레칭, 근력/유산소 운동, 회복 가이드, 동기부여 피드백 등을 제공합니다. ",
                "최신 연구와 데이터 기반 권장 사항을 참고하며, 친근하고 전문적인 톤으로 안내합니다."
            )
            .to_string(),
            input_type: "text (사용자의 컨디션, 운동 목표, 수면/생활 정보 등)".to_string(),
            output_type: "text (맞춤 운동 루틴, 단계별 안내, 동기부여 메시지)".to_string(),
            metrics: ModelMetrics {
                accuracy: "N/A (추천 및 안내 중심 AI 모델)".to_string(),
                f1_score: "N/A".to_string(),
            },
            limitations: vec![
                "의료 전문가의 진단이나 처방을 대체하지 않습니다.".to_string(),
                "심각한 질병이나 부상 상태에서는 운동 권고를 제공하지 않습니다.".to_string(),
                "추천은 사용자가 제공한 정보에 기반하며, 모든 개인에게 최적화된 것은 아닙니다."
                    .to_string(),
            ],
            contact: "hyeonjj@comcom.ai".to_string(),
            api_endpoint: format!("{}/api/agent", base_url.trim_end_matches('/')),
            api_method: "POST".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url_without_double_slash() {
        let card = ModelCard::pitcoach_mint("https://coach.example.com/");
        assert_eq!(card.api_endpoint, "https://coach.example.com/api/agent");
        assert_eq!(card.api_method, "POST");
    }

    #[test]
    fn card_lists_three_limitations() {
        let card = ModelCard::pitcoach_mint("http://localhost:8080");
        assert_eq!(card.limitations.len(), 3);
    }

    #[test]
    fn serialization_keeps_declared_field_order() {
        let json = serde_json::to_string(&ModelCard::pitcoach_mint("http://x")).unwrap();
        let name = json.find("\"model_name\"").unwrap();
        let method = json.find("\"api_method\"").unwrap();
        assert!(name < method);
        assert!(json.starts_with("{\"model_name\":\"my-first-mcp-agent\",\"version\":\"v1.0\""));
    }
}
