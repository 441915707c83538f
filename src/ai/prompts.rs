//! Prompt templates sent to the completion API.

use super::dto::{MealPlanRequest, WorkoutPlanRequest};

pub const JSON_ONLY_SYSTEM: &str = "Return ONLY valid JSON. No text.";

pub const COACH_SYSTEM: &str = r#"You are a fitness coach chatbot.

CRITICAL RULES (MANDATORY):
- NO explanations
- NO storytelling
- NO paragraphs
- NO tips unless asked
- NO repetition
- Use ONLY bullet points
- Max 5 bullets TOTAL
- Each bullet <= 12 words
- Be factual and direct
- If comparison is needed, use 1-line table only

ALLOWED FORMAT ONLY:

Title:
- bullet
- bullet

If user asks "why", answer in 2 bullets MAX.
If user asks comparison, give 1 table + 1 conclusion bullet.

Do NOT add extra sections.
Do NOT add summaries.
Do NOT add recommendations unless explicitly asked."#;

pub fn meal_plan_prompt(req: &MealPlanRequest) -> String {
    format!(
        r#"Create a Kerala-style {goal} meal plan.

Rules:
- Kerala foods only
- Diet: {diet}
- Meals/day: {meals}
- Budget: {budget}
- No explanations

Return JSON ONLY:

{{
  "calories": number,
  "meals": [
    {{
      "name": "Breakfast | Lunch | Snack | Dinner",
      "time": "8:00 AM",
      "foods": [
        {{
          "name": "Food",
          "calories": number,
          "protein": number,
          "carbs": number,
          "fats": number
        }}
      ]
    }}
  ]
}}"#,
        goal = req.goal,
        diet = req.diet_type,
        meals = req.meals_per_day,
        budget = req.budget,
    )
}

pub fn workout_plan_prompt(req: &WorkoutPlanRequest) -> String {
    format!(
        r#"Generate a workout plan in JSON format.
RETURN ONLY JSON. DO NOT enclose it in markdown code blocks.

Goal: {goal}
Experience: {experience}
Equipment: {equipment}
Days/week: {days}
Time/session: {minutes} min
Split: {split}

Structure the JSON exactly like this:
{{
  "name": "Custom {split} Plan",
  "goal": "{goal}",
  "split": "{split}",
  "days": [
    {{
      "day": "Day 1",
      "name": "Push (Chest/Shoulders/Triceps)",
      "exercises": [
        {{
          "name": "Exercise Name",
          "sets": 3,
          "reps": "8-12",
          "rest": "60s",
          "videoUrl": "https://www.youtube.com/results?search_query=Exercise+Name+tutorial"
        }}
      ]
    }}
  ]
}}

Rules:
- Create {days} days.
- Be specific with exercise names.
- Provide appropriate sets (usually 3-4) and reps (e.g., "8-12", "5x5", "Failure").
- Include rest times.
- Include a "videoUrl" for EACH exercise. Use the format: https://www.youtube.com/results?search_query={{Exercise Name}}+tutorial"#,
        goal = req.goal,
        experience = req.experience,
        equipment = req.equipment,
        days = req.days_per_week,
        minutes = req.time_per_session,
        split = req.split,
    )
}
