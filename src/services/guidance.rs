// Context Advisor
// Detects what the argument is about and attaches domain guidance to the result

use std::sync::Arc;
use tracing::debug;

use crate::models::{ArgumentContext, Guidance, ReasoningChain, StepRelation, StepRole};
use super::config_store::AnalyzerConfig;
use super::text_processor::{tokenize, PhraseMatcher};

/// Detection priority; the first context with a keyword hit wins.
const CONTEXT_PRIORITY: [ArgumentContext; 5] = [
    ArgumentContext::Academic,
    ArgumentContext::Relationship,
    ArgumentContext::Career,
    ArgumentContext::Financial,
    ArgumentContext::Health,
];

const DELIBERATION_WORDS: &[&str] = &["should", "decide", "choose", "whether"];
const STRESS_WORDS: &[&str] = &["stress", "stressed", "overwhelm", "overwhelmed", "anxious", "worried"];

pub struct ContextAdvisor {
    contexts: Vec<(ArgumentContext, PhraseMatcher)>,
}

impl ContextAdvisor {
    pub fn new(config: Arc<AnalyzerConfig>) -> Self {
        let contexts = CONTEXT_PRIORITY
            .iter()
            .filter_map(|ctx| {
                let keywords = config.lexicons.contexts.get(ctx.as_str())?;
                Some((*ctx, PhraseMatcher::new(keywords)))
            })
            .collect();
        Self { contexts }
    }

    pub fn detect_context(&self, tokens: &[String]) -> ArgumentContext {
        self.contexts
            .iter()
            .find(|(_, matcher)| matcher.matches(tokens))
            .map(|(ctx, _)| *ctx)
            .unwrap_or(ArgumentContext::General)
    }

    pub fn advise(&self, chain: &ReasoningChain) -> (ArgumentContext, Vec<Guidance>) {
        let tokens: Vec<String> = chain.steps().iter().flat_map(|s| tokenize(s.text())).collect();
        let context = self.detect_context(&tokens);
        let has = |words: &[&str]| tokens.iter().any(|t| words.contains(&t.as_str()));

        let mut guidance: Vec<Guidance> = chain.contradictions().map(conflict_note).collect();

        let has_conclusion = chain.steps().iter().any(|s| s.role() == StepRole::Conclusion);
        if !has_conclusion
            && chain.len() > 1
            && !matches!(context, ArgumentContext::Academic | ArgumentContext::Health)
        {
            guidance.push(conclusion_prompt(context));
        }

        guidance.extend(domain_checklist(context, &has));

        if has(DELIBERATION_WORDS) {
            guidance.push(Guidance {
                topic: "Decision-making framework".to_string(),
                points: points(&[
                    "List your options clearly",
                    "Weigh the pros and cons of each option",
                    "Check how each option aligns with your values and goals",
                    "Consider likely outcomes and consequences",
                    "Give yourself a deadline to decide",
                    "Trust your instincts but verify with facts",
                ]),
            });
        }

        if has(STRESS_WORDS) {
            guidance.push(Guidance {
                topic: "Well-being".to_string(),
                points: points(&[
                    "Take a few deep breaths and ground yourself in the present",
                    "Talk to a trusted friend or professional",
                    "It's okay to have these feelings; be kind to yourself",
                    "Consider journaling to process your thoughts",
                ]),
            });
        }

        debug!(context = context.as_str(), items = guidance.len(), "[guidance] advice prepared");
        (context, guidance)
    }
}

fn points(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn conflict_note(relation: &StepRelation) -> Guidance {
    Guidance {
        topic: format!("Steps {} and {} pull in opposite directions", relation.source, relation.target),
        points: vec![
            format!("Both talk about {} but only one is negated", relation.shared.join(", ")),
            "Clarify how both statements can be true".to_string(),
            "Revise one of them, or add the context that reconciles them".to_string(),
        ],
    }
}

fn conclusion_prompt(context: ArgumentContext) -> Guidance {
    let (review, template) = match context {
        ArgumentContext::Relationship => (
            "Review your main reasons for considering this decision",
            "Consider: 'Based on how I feel and what I need in a relationship...'",
        ),
        ArgumentContext::Career => (
            "Review your career goals and current situation",
            "Consider: 'Given my skills and aspirations, I should...'",
        ),
        ArgumentContext::Financial => (
            "Review your financial situation and goals",
            "Consider: 'Based on my current finances and future plans...'",
        ),
        _ => (
            "Summarize your main points",
            "State what action or decision follows from your reasoning",
        ),
    };
    Guidance {
        topic: "Craft a clear conclusion".to_string(),
        points: points(&[review, template]),
    }
}

fn domain_checklist(context: ArgumentContext, has: &dyn Fn(&[&str]) -> bool) -> Vec<Guidance> {
    let mut out = Vec::new();
    match context {
        ArgumentContext::Academic => {
            let reviewing = has(&["study", "exam", "test", "review"]);
            let struggling = has(&["struggle", "struggling", "difficult", "hard"]);
            if reviewing && struggling {
                out.push(Guidance {
                    topic: "Study strategy for challenging topics".to_string(),
                    points: points(&[
                        "Break the material into smaller chunks",
                        "Use active recall such as self-quizzing",
                        "Try a different learning method, like practice problems or a study group",
                        "Schedule regular review sessions",
                    ]),
                });
            }
            if has(&["exam", "exams", "test", "tests", "final", "finals"]) {
                out.push(Guidance {
                    topic: "Exam preparation".to_string(),
                    points: points(&[
                        "Create a study schedule leading up to the exam",
                        "Practice with past exams or sample questions",
                        "Teach the material to someone else to test your understanding",
                        "Get adequate rest before exam day",
                    ]),
                });
            }
            if out.is_empty() {
                out.push(Guidance {
                    topic: "Academic habits".to_string(),
                    points: points(&[
                        "Attend classes and take thorough notes",
                        "Review material shortly after class",
                        "Ask professors or TAs for help early",
                        "Form or join a study group",
                    ]),
                });
            }
        }
        ArgumentContext::Relationship => {
            if has(&["break", "breakup", "end", "ending"]) {
                out.push(Guidance {
                    topic: "Considering a breakup".to_string(),
                    points: points(&[
                        "Have you communicated your concerns to your partner?",
                        "Consider couples counseling if you're both willing",
                        "Separate deal-breakers from workable issues",
                        "Imagine your life in one year with and without this relationship",
                    ]),
                });
            }
            if has(&["happy", "unhappy", "unsatisfied"]) {
                out.push(Guidance {
                    topic: "Reflective questions".to_string(),
                    points: points(&[
                        "What specifically would make you happier in this relationship?",
                        "Have your needs changed over time?",
                        "What have you learned about what you need in a partner?",
                    ]),
                });
            }
        }
        ArgumentContext::Career => out.push(Guidance {
            topic: "Career development".to_string(),
            points: points(&[
                "Update your resume and professional profile",
                "Set specific job search goals, such as applications per week",
                "Reach out to a few contacts in your network each week",
                "Track your applications and follow-ups",
            ]),
        }),
        ArgumentContext::Financial => out.push(Guidance {
            topic: "Financial planning".to_string(),
            points: points(&[
                "Track all income and expenses for one month",
                "Create a realistic budget based on actual spending",
                "Set specific savings goals, starting with an emergency fund",
                "Consider consulting a financial advisor",
            ]),
        }),
        ArgumentContext::Health => {
            if has(&["eat", "eating", "dinner", "lunch", "breakfast", "snack"]) {
                out.push(Guidance {
                    topic: "Nutrition".to_string(),
                    points: points(&[
                        "Aim for balanced meals with protein, vegetables and whole grains",
                        "Drink water throughout the day",
                        "Plan meals ahead to make healthier choices easier",
                    ]),
                });
            }
            if has(&["sleep", "sleeping", "rest", "tired"]) {
                out.push(Guidance {
                    topic: "Sleep hygiene".to_string(),
                    points: points(&[
                        "Keep a consistent sleep schedule",
                        "Limit screen time before bed",
                        "Keep your sleep environment dark and comfortable",
                    ]),
                });
            }
            if out.is_empty() {
                out.push(Guidance {
                    topic: "Wellness reminder".to_string(),
                    points: points(&[
                        "Take breaks to stretch and move during the day",
                        "Small, consistent habits add up over time",
                    ]),
                });
            }
        }
        ArgumentContext::General => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::parser::ChainParser;

    fn advise(text: &str) -> (ArgumentContext, Vec<Guidance>) {
        let config = Arc::new(AnalyzerConfig::default());
        let chain = ChainParser::new(config.clone()).parse(text).unwrap();
        ContextAdvisor::new(config).advise(&chain)
    }

    fn topics(guidance: &[Guidance]) -> Vec<&str> {
        guidance.iter().map(|g| g.topic.as_str()).collect()
    }

    #[test]
    fn test_academic_takes_priority() {
        let (ctx, guidance) = advise("My job leaves no time to study for the exam");
        assert_eq!(ctx, ArgumentContext::Academic);
        assert_eq!(topics(&guidance), vec!["Exam preparation"]);
    }

    #[test]
    fn test_financial_chain_without_conclusion() {
        let (ctx, guidance) = advise("I never save money\nMy expenses keep growing");
        assert_eq!(ctx, ArgumentContext::Financial);
        assert_eq!(topics(&guidance), vec!["Craft a clear conclusion", "Financial planning"]);
        assert!(guidance[0].points[1].contains("current finances"));
    }

    #[test]
    fn test_deliberation_and_stress() {
        let (ctx, guidance) = advise("I feel stressed and worried\nI should decide soon");
        assert_eq!(ctx, ArgumentContext::General);
        assert_eq!(topics(&guidance), vec!["Decision-making framework", "Well-being"]);
    }

    #[test]
    fn test_contradicting_steps_are_called_out() {
        let (_, guidance) = advise("Remote work boosts productivity\nRemote work doesn't boost productivity");
        assert_eq!(guidance[0].topic, "Steps 1 and 2 pull in opposite directions");
        assert!(guidance[0].points[0].starts_with("Both talk about boost, productivity"));
    }

    #[test]
    fn test_general_single_step_gets_nothing() {
        let (ctx, guidance) = advise("The sky is blue");
        assert_eq!(ctx, ArgumentContext::General);
        assert!(guidance.is_empty());
    }
}
