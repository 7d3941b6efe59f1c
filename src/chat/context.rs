use crate::types::{AdditionalContext, DocumentType, Turn};

/// 上下文窗口保留的最近对话条数
pub const CONTEXT_WINDOW: usize = 10;

const BASE_PROMPT: &str = "You are an AI assistant helping users create and improve project documentation.
You should provide helpful, accurate, and contextual suggestions while maintaining a collaborative tone.
Always ask clarifying questions when user requests are ambiguous.";

const VISION_PROMPT: &str = "You are specifically helping with a vision document. Focus on:
- Clear problem statements and solutions
- Target audience and user needs
- Business goals and success criteria
- Strategic direction and market context
Ask questions about stakeholders, market fit, and business objectives.";

const REQUIREMENTS_PROMPT: &str = "You are specifically helping with technical requirements. Focus on:
- Complete and unambiguous specifications
- Acceptance criteria and edge cases
- Technical constraints and dependencies
- Implementation considerations
Ask questions about completeness, testability, and technical feasibility.";

const USER_STORY_PROMPT: &str = "You are specifically helping with user stories. Focus on:
- User motivation and value proposition
- Clear acceptance criteria
- User journey and workflow
- Testable scenarios
Ask questions about user needs, workflows, and success measures.";

impl DocumentType {
    fn guidance(&self) -> &'static str {
        match self {
            DocumentType::Vision => VISION_PROMPT,
            DocumentType::Requirements => REQUIREMENTS_PROMPT,
            DocumentType::UserStory => USER_STORY_PROMPT,
        }
    }
}

/// 基础提示
pub fn base_prompt() -> &'static str {
    BASE_PROMPT
}

/// 根据文档类型构建系统提示，未知类型只返回基础提示
pub fn build_system_prompt(document_type: Option<&str>) -> String {
    match document_type.and_then(DocumentType::from_tag) {
        Some(kind) => format!("{}\n\n{}", BASE_PROMPT, kind.guidance()),
        None => BASE_PROMPT.to_string(),
    }
}

/// 从最近的用户/助手消息构建上下文窗口
///
/// 系统消息（包括错误记录）不进入窗口。
pub fn build_context(turns: &[Turn], additional: Option<&AdditionalContext>) -> String {
    let dialogue: Vec<&Turn> = turns.iter().filter(|t| t.is_dialogue()).collect();
    let start = dialogue.len().saturating_sub(CONTEXT_WINDOW);

    let mut context = dialogue[start..]
        .iter()
        .map(|t| format!("{}: {}", t.role.as_str(), t.content))
        .collect::<Vec<_>>()
        .join("\n");

    if let Some(extra) = additional {
        if let Some(content) = &extra.document_content {
            context.push_str(&format!("\n\nCurrent document content:\n{}", content));
        }
        if let Some(project) = &extra.project_context {
            context.push_str(&format!("\n\nProject context:\n{}", project));
        }
    }

    context
}
