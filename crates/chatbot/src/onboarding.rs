//! First-visit onboarding: goal, interests, then knowledge level.

use numina_core::{KnowledgeLevel, Message, QuickReply};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    #[default]
    Goal,
    Interests,
    KnowledgeLevel,
    Complete,
}

/// Interest value that moves on to the knowledge-level question.
pub const START: &str = "start";
/// Interest value that re-offers the topic list.
pub const MORE: &str = "more";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingState {
    pub step: OnboardingStep,
    pub goal: String,
    /// Selection order, no duplicates
    pub interests: Vec<String>,
    pub knowledge_level: KnowledgeLevel,
}

fn topic_quick_replies() -> Vec<QuickReply> {
    vec![
        QuickReply::new("💰 Budgeting", "budgeting"),
        QuickReply::new("📈 Investing", "investing"),
        QuickReply::new("💳 Credit & Debt", "credit"),
        QuickReply::new("🎯 Goal Setting", "goals"),
        QuickReply::new("💸 Saving Money", "saving"),
    ]
}

impl OnboardingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state that skips onboarding entirely.
    pub fn completed(level: KnowledgeLevel) -> Self {
        Self {
            step: OnboardingStep::Complete,
            knowledge_level: level,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.step == OnboardingStep::Complete
    }

    /// Feed one user response. Returns the next state and the reply.
    ///
    /// Input the current step cannot use yields an empty bot message and an
    /// unchanged state.
    pub fn advance(&self, response: &str) -> (OnboardingState, Message) {
        match self.step {
            OnboardingStep::Goal => self.accept_goal(response),
            OnboardingStep::Interests => self.accept_interest(response),
            OnboardingStep::KnowledgeLevel => match response.parse::<KnowledgeLevel>() {
                Ok(level) => self.finish(level),
                Err(_) => (self.clone(), Message::bot("")),
            },
            OnboardingStep::Complete => (self.clone(), Message::bot("")),
        }
    }

    fn accept_goal(&self, goal: &str) -> (OnboardingState, Message) {
        let next = OnboardingState {
            step: OnboardingStep::Interests,
            goal: goal.to_string(),
            ..self.clone()
        };
        let reply = Message::bot(format!(
            "That's awesome! {goal} is a great goal to work towards. 🎯\n\nNow, which financial topics are you most interested in learning about? (You can pick more than one!)"
        ))
        .with_quick_replies(topic_quick_replies());
        (next, reply)
    }

    fn accept_interest(&self, response: &str) -> (OnboardingState, Message) {
        if response == START {
            let next = OnboardingState {
                step: OnboardingStep::KnowledgeLevel,
                ..self.clone()
            };
            let reply = Message::bot(
                "One last thing! How comfortable are you with financial terms and concepts?\n\nThis helps me explain things in a way that makes sense for you. 😊",
            )
            .with_quick_replies(vec![
                QuickReply::new("🌱 Beginner - Just starting out", "beginner"),
                QuickReply::new("📚 Intermediate - Know the basics", "intermediate"),
                QuickReply::new("🎓 Advanced - Pretty comfortable", "advanced"),
            ]);
            return (next, reply);
        }

        if response == MORE {
            let mut replies = topic_quick_replies();
            replies.push(QuickReply::new("✅ Done selecting", START));
            let reply = Message::bot("Great! Pick another topic you'd like to learn about:")
                .with_quick_replies(replies);
            return (self.clone(), reply);
        }

        let mut next = self.clone();
        if !next.interests.iter().any(|i| i == response) {
            next.interests.push(response.to_string());
        }
        let reply = Message::bot(format!(
            "Perfect! I'll focus on helping you with {}. {}\n\nWant to select more topics, or shall we get started?",
            next.interests.join(", "),
            if next.interests.len() > 1 { "Great choices!" } else { "" }
        ))
        .with_quick_replies(vec![
            QuickReply::new("✅ Let's get started!", START),
            QuickReply::new("➕ Add more topics", MORE),
        ]);
        (next, reply)
    }

    fn finish(&self, level: KnowledgeLevel) -> (OnboardingState, Message) {
        let level_message = match level {
            KnowledgeLevel::Beginner => {
                "Perfect! I'll explain things step by step and avoid jargon. Don't hesitate to ask if anything is unclear!"
            }
            KnowledgeLevel::Intermediate => {
                "Great! I'll use common financial terms but still provide context when needed."
            }
            KnowledgeLevel::Advanced => {
                "Awesome! I'll dive right into the details and use industry terminology."
            }
        };

        let has = |topic: &str| self.interests.iter().any(|i| i == topic);
        let tip = if has("budgeting") {
            "\n\n💡 Quick tip: Looking at your accounts, you're doing great! You've spent 89% of your monthly budget with some time left. Keep an eye on Food & Dining expenses to stay on track."
        } else if has("investing") {
            "\n\n💡 Quick tip: With your savings of $5,234.50, you could start small with investing. Even $50-100/month in a low-cost index fund can grow significantly over time!"
        } else if has("saving") {
            "\n\n💡 Quick tip: Your Emergency Fund is 50% complete - amazing progress! Keep up those $75 weekly contributions to hit your goal by February."
        } else {
            ""
        };

        let next = OnboardingState {
            step: OnboardingStep::Complete,
            knowledge_level: level,
            ..self.clone()
        };
        let reply = Message::bot(format!(
            "{level_message}\n\nBased on your goal of \"{}\" and your interest in {}, I'll provide personalized advice to help you succeed.{tip}\n\nFeel free to ask me anything - I'm analyzing your account data to give you the most relevant insights. What would you like to know first?",
            self.goal,
            self.interests.join(", ")
        ))
        .with_quick_replies(vec![
            QuickReply::new("💰 Tell me about budgeting", "tell me about budgeting"),
            QuickReply::new("📈 Tell me about investing", "tell me about investing"),
            QuickReply::new("💳 Tell me about credit", "tell me about credit"),
            QuickReply::new("📊 Show my account summary", "what's my account balance?"),
        ]);
        (next, reply)
    }
}
