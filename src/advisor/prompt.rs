//! Prompt text and response schema for advisor calls.

use serde_json::{Value, json};

use super::types::Verdict;
use crate::chat::options::{Budget, Mood};

/// Instructions sent alongside the room photo for analysis.
#[must_use]
pub fn analyze_prompt(budget: Budget, mood: Mood) -> String {
    format!(
        r#"As an honest, practical Indian interior advisor for "unaesthetic" spaces, analyze this room photo.
User's Goal Budget Level: {budget}
Desired Mood: {mood}

STRICT GUIDELINES:
1. Think like a "budget hacker." Focus on rented homes and typical "unaesthetic" Indian apartments.
2. Prioritize high-impact, low-cost fixes: lighting, paint, plants, decluttering.
3. Provide a structured breakup of costs with ranges (e.g., "18,000 - 22,000").
4. Include an "Ultra-budget version" for users who negotiate labor or reuse items.
5. Include a "Designer POV" honest take, specifically a formula like "X + Y = Z% transformation".

Return the analysis as JSON with the fields verdict, estimated_cost, ultra_budget_cost,
transformation_logic, breakup (list of {{item, cost}}), worth_fixing, avoid_spending_on, reasoning."#
    )
}

/// Instructions for the "after" concept image.
#[must_use]
pub fn visualize_prompt(verdict: &Verdict, mood: Mood) -> String {
    format!(
        r#"Based on this "unaesthetic" Indian room, generate a realistic "after" concept.
Improvements: {improvements}
Mood: {mood}
Implement specific low-cost hacks: Warm lighting, white walls, plants.
Keep furniture structure same but make space breathable."#,
        improvements = verdict.guidance(),
    )
}

/// Structured-output schema for the itemized verdict.
#[must_use]
pub fn verdict_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": { "type": "STRING" },
            "estimated_cost": { "type": "STRING" },
            "ultra_budget_cost": { "type": "STRING" },
            "transformation_logic": { "type": "STRING" },
            "breakup": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": { "type": "STRING" },
                        "cost": { "type": "STRING" }
                    },
                    "required": ["item", "cost"]
                }
            },
            "worth_fixing": { "type": "ARRAY", "items": { "type": "STRING" } },
            "avoid_spending_on": { "type": "ARRAY", "items": { "type": "STRING" } },
            "reasoning": { "type": "STRING" }
        },
        "required": [
            "verdict",
            "estimated_cost",
            "ultra_budget_cost",
            "transformation_logic",
            "breakup",
            "worth_fixing",
            "avoid_spending_on",
            "reasoning"
        ]
    })
}
