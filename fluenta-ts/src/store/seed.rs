//! Startup seed data: prompt bank, categories, learning resources

use fluenta_common::models::{
    LearningResource, PromptKind, SkillArea, TestCategory, TestPrompt,
};
use fluenta_common::{CefrLevel, Difficulty};
use tracing::info;

use super::Store;

impl Store {
    /// Populate the static reference data: prompts, categories, resources
    pub async fn seed(&self) {
        for prompt in seed_prompts() {
            self.insert_prompt(prompt).await;
        }
        for category in seed_categories() {
            self.insert_category(category).await;
        }
        for resource in seed_resources() {
            self.insert_resource(resource).await;
        }

        info!(
            prompts = self.all_prompts().await.len(),
            categories = self.all_categories().await.len(),
            resources = self.all_resources().await.len(),
            "Seed data loaded"
        );
    }
}

fn prompt(
    text: &str,
    kind: PromptKind,
    difficulty: Difficulty,
    cefr_level: CefrLevel,
    tips: &[&str],
    resource_url: Option<&str>,
    time_limit_seconds: u32,
) -> TestPrompt {
    TestPrompt {
        id: 0,
        text: text.to_string(),
        kind,
        difficulty,
        cefr_level,
        tips: tips.iter().map(|t| t.to_string()).collect(),
        resource_url: resource_url.map(|u| u.to_string()),
        time_limit_seconds,
    }
}

fn seed_prompts() -> Vec<TestPrompt> {
    vec![
        // Beginner
        prompt(
            "Read aloud: \"My name is Ana. I live in a small town near the sea. \
             Every morning I walk to work and buy a coffee on the way.\"",
            PromptKind::ReadAloud,
            Difficulty::Beginner,
            CefrLevel::A1,
            &[
                "Read slowly and clearly",
                "Pause briefly at each full stop",
            ],
            None,
            60,
        ),
        prompt(
            "Describe your daily routine. What do you do in the morning, \
             afternoon, and evening?",
            PromptKind::TopicDiscussion,
            Difficulty::Beginner,
            CefrLevel::A2,
            &[
                "Use simple present tense",
                "Mention at least three activities",
            ],
            None,
            90,
        ),
        prompt(
            "Look at the picture of a family having breakfast together. \
             Describe what you see.",
            PromptKind::PictureDescription,
            Difficulty::Beginner,
            CefrLevel::A2,
            &[
                "Name the people and objects you see",
                "Say where things are (on, under, next to)",
            ],
            Some("https://images.fluenta.example/breakfast-table.jpg"),
            90,
        ),
        prompt(
            "You are ordering food in a cafe. Greet the server, ask about the \
             menu, and order a meal and a drink.",
            PromptKind::RolePlay,
            Difficulty::Beginner,
            CefrLevel::A2,
            &["Use polite phrases like 'could I have'", "Ask one question"],
            None,
            90,
        ),
        // Intermediate
        prompt(
            "Read aloud: \"Although the forecast promised sunshine, the clouds \
             rolled in before noon, and by the time the match started the rain \
             was falling steadily across the pitch.\"",
            PromptKind::ReadAloud,
            Difficulty::Intermediate,
            CefrLevel::B1,
            &[
                "Watch the linking words: although, and, by the time",
                "Keep a steady rhythm through the long sentence",
            ],
            None,
            60,
        ),
        prompt(
            "Talk about a trip you enjoyed. Where did you go, who were you \
             with, and what made it memorable?",
            PromptKind::TopicDiscussion,
            Difficulty::Intermediate,
            CefrLevel::B1,
            &[
                "Use past tenses consistently",
                "Give one specific detail or story",
            ],
            None,
            120,
        ),
        prompt(
            "Look at the picture of a crowded railway station. Describe the \
             scene and guess what some of the people are doing.",
            PromptKind::PictureDescription,
            Difficulty::Intermediate,
            CefrLevel::B1,
            &[
                "Use present continuous for actions",
                "Speculate with 'might' and 'probably'",
            ],
            Some("https://images.fluenta.example/railway-station.jpg"),
            120,
        ),
        prompt(
            "You bought a jacket online and it arrived damaged. Call customer \
             service, explain the problem, and ask for a replacement or refund.",
            PromptKind::RolePlay,
            Difficulty::Intermediate,
            CefrLevel::B2,
            &[
                "Describe the problem precisely",
                "Stay polite but firm about what you want",
            ],
            None,
            120,
        ),
        // Advanced
        prompt(
            "Read aloud: \"The committee's recommendation, controversial though \
             it was, reflected a growing consensus that short-term savings \
             rarely justify the erosion of public trust.\"",
            PromptKind::ReadAloud,
            Difficulty::Advanced,
            CefrLevel::B2,
            &[
                "Mind the embedded clause set off by commas",
                "Stress the contrastive words: rarely, erosion",
            ],
            None,
            60,
        ),
        prompt(
            "Some people believe remote work harms collaboration; others say \
             it boosts productivity. Present both sides, then argue your own \
             position.",
            PromptKind::TopicDiscussion,
            Difficulty::Advanced,
            CefrLevel::C1,
            &[
                "Structure: both sides first, then your view",
                "Use linking phrases: on the other hand, moreover, however",
            ],
            None,
            150,
        ),
        prompt(
            "Look at the chart comparing city and rural internet access over \
             ten years. Summarize the trends and suggest one explanation.",
            PromptKind::PictureDescription,
            Difficulty::Advanced,
            CefrLevel::C1,
            &[
                "Describe the overall trend before the details",
                "Use comparative language: narrowed, outpaced, plateaued",
            ],
            Some("https://images.fluenta.example/internet-access-chart.png"),
            150,
        ),
        prompt(
            "You are negotiating a deadline extension with a demanding client. \
             Acknowledge their concerns, explain the delay, and propose a \
             revised schedule.",
            PromptKind::RolePlay,
            Difficulty::Advanced,
            CefrLevel::C1,
            &[
                "Open by acknowledging their position",
                "Offer a concrete alternative, not just an apology",
            ],
            None,
            150,
        ),
        // Expert
        prompt(
            "Read aloud: \"Whatever merit the proposal may have had in \
             principle, its execution betrayed a disregard for the very \
             constituencies it purported to serve, a contradiction the \
             minister never satisfactorily addressed.\"",
            PromptKind::ReadAloud,
            Difficulty::Expert,
            CefrLevel::C2,
            &[
                "Keep the long subordinate clauses intelligible",
                "Let intonation carry the irony of 'purported'",
            ],
            None,
            60,
        ),
        prompt(
            "To what extent should governments regulate artificial \
             intelligence? Weigh innovation, safety, and civil liberties, and \
             defend a nuanced position.",
            PromptKind::TopicDiscussion,
            Difficulty::Expert,
            CefrLevel::C2,
            &[
                "Concede the strongest opposing point explicitly",
                "Aim for precision over breadth",
            ],
            None,
            180,
        ),
        prompt(
            "Look at the two photographs: a 1970s factory floor and a modern \
             automated warehouse. Compare them and discuss what the change has \
             meant for workers.",
            PromptKind::PictureDescription,
            Difficulty::Expert,
            CefrLevel::C2,
            &[
                "Move beyond description into interpretation",
                "Consider more than one perspective on the change",
            ],
            Some("https://images.fluenta.example/factory-then-now.jpg"),
            180,
        ),
        prompt(
            "You are chairing a meeting where two senior colleagues disagree \
             sharply about strategy. Summarize each position fairly, defuse \
             the tension, and steer the group toward a decision.",
            PromptKind::RolePlay,
            Difficulty::Expert,
            CefrLevel::C2,
            &[
                "Paraphrase both positions before giving direction",
                "Use diplomatic hedging where it helps",
            ],
            None,
            180,
        ),
    ]
}

fn seed_categories() -> Vec<TestCategory> {
    let category = |name: &str, description: &str, icon: &str| TestCategory {
        id: 0,
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    };

    vec![
        category(
            "Everyday Conversation",
            "Daily routines, small talk, and familiar situations",
            "chat",
        ),
        category(
            "Work & Study",
            "Meetings, presentations, and academic discussion",
            "briefcase",
        ),
        category(
            "Travel & Services",
            "Getting around, bookings, and resolving problems",
            "globe",
        ),
        category(
            "Opinions & Debate",
            "Arguing a position and weighing both sides",
            "scale",
        ),
    ]
}

fn seed_resources() -> Vec<LearningResource> {
    let resource = |title: &str, url: &str, kind: &str, skill: SkillArea, range: &str| {
        LearningResource {
            id: 0,
            title: title.to_string(),
            url: url.to_string(),
            kind: kind.to_string(),
            skill,
            cefr_range: range.to_string(),
        }
    };

    vec![
        resource(
            "Academic Word List practice decks",
            "https://learn.fluenta.example/awl-decks",
            "flashcards",
            SkillArea::Vocabulary,
            "B1-C1",
        ),
        resource(
            "Phrasal verbs in context",
            "https://learn.fluenta.example/phrasal-verbs",
            "article",
            SkillArea::Vocabulary,
            "A2-B2",
        ),
        resource(
            "Narrative tenses walkthrough",
            "https://learn.fluenta.example/narrative-tenses",
            "video",
            SkillArea::Grammar,
            "B1-B2",
        ),
        resource(
            "Conditionals self-check quiz",
            "https://learn.fluenta.example/conditionals-quiz",
            "quiz",
            SkillArea::Grammar,
            "A2-C1",
        ),
        resource(
            "Shadowing drills with news clips",
            "https://learn.fluenta.example/shadowing",
            "exercise",
            SkillArea::Fluency,
            "B1-C2",
        ),
        resource(
            "One-minute topic sprints",
            "https://learn.fluenta.example/topic-sprints",
            "exercise",
            SkillArea::Fluency,
            "A2-B2",
        ),
        resource(
            "Minimal pairs trainer",
            "https://learn.fluenta.example/minimal-pairs",
            "exercise",
            SkillArea::Pronunciation,
            "A1-B1",
        ),
        resource(
            "Sentence stress and intonation guide",
            "https://learn.fluenta.example/sentence-stress",
            "video",
            SkillArea::Pronunciation,
            "B1-C1",
        ),
        resource(
            "CEFR speaking descriptors explained",
            "https://learn.fluenta.example/cefr-speaking",
            "article",
            SkillArea::General,
            "A1-C2",
        ),
    ]
}
