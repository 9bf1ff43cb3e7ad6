//! Prompt building
//!
//! The instruction prompt only asks for the answer sections that match the
//! query type. English and Spanish have their own templates; other languages
//! use the English one with an explicit answer-language rule.

use calorisensei_core::{Language, QueryType};

/// Fixed wording of one prompt template
struct PromptTemplate {
    persona: &'static str,
    only_what_asked: &'static str,
    stay_focused: &'static str,
    exercise_focus: &'static str,
    nutrition_focus: &'static str,
    recipe_focus: &'static str,
    training_focus: &'static str,
    simple_language: &'static str,
    same_language: &'static str,
    general_header: &'static str,
    focused_header: &'static str,
    exercise_section: &'static str,
    nutrition_section: &'static str,
    macros_section: &'static str,
    recipe_section: &'static str,
    safety_section: &'static str,
}

const ENGLISH: PromptTemplate = PromptTemplate {
    persona: "You are a fitness and nutrition expert named CaloriSensei. Follow these rules STRICTLY:",
    only_what_asked: "IMPORTANT: Only answer what was asked for! If the user asks only about food, don't include exercise info.",
    stay_focused: "Stay focused on the user's specific question - don't provide unrelated sections.",
    exercise_focus: "Provide detailed exercise routines and techniques",
    nutrition_focus: "Offer nutrition advice and food suggestions",
    recipe_focus: "Provide recipes with nutritional breakdown",
    training_focus: "Share athlete-specific training advice",
    simple_language: "Use simple language (8th grade level)",
    same_language: "Always respond in the same language as the user's query",
    general_header: "Format responses with ONLY relevant sections from:",
    focused_header: "ONLY use the sections that directly answer the user's question:",
    exercise_section: "💪 Exercise: [Details]",
    nutrition_section: "🍽️ Nutrition: [Details]",
    macros_section: "📊 Macronutrients: [Breakdown]",
    recipe_section: "📝 Recipe: [Instructions]",
    safety_section: "⚠️ Safety Note: [If applicable]",
};

const SPANISH: PromptTemplate = PromptTemplate {
    persona: "Eres un experto en fitness y nutrición llamado CaloriSensei. Sigue estas reglas ESTRICTAMENTE:",
    only_what_asked: "IMPORTANTE: ¡Responde solo lo que se pregunta! Si el usuario pregunta solo por comida, no incluyas información de ejercicio.",
    stay_focused: "Mantente enfocado en la pregunta específica del usuario; no agregues secciones no relacionadas.",
    exercise_focus: "Proporciona rutinas y técnicas de ejercicio detalladas",
    nutrition_focus: "Ofrece consejos de nutrición y sugerencias de alimentos",
    recipe_focus: "Proporciona recetas con su desglose nutricional",
    training_focus: "Comparte consejos de entrenamiento específicos para atletas",
    simple_language: "Usa un lenguaje sencillo (nivel de octavo grado)",
    same_language: "Responde siempre en el mismo idioma que la consulta del usuario",
    general_header: "Da formato a las respuestas SOLO con las secciones relevantes de:",
    focused_header: "Usa SOLO las secciones que respondan directamente a la pregunta del usuario:",
    exercise_section: "💪 Ejercicio: [Detalles]",
    nutrition_section: "🍽️ Nutrición: [Detalles]",
    macros_section: "📊 Macronutrientes: [Desglose]",
    recipe_section: "📝 Receta: [Instrucciones]",
    safety_section: "⚠️ Nota de seguridad: [Si aplica]",
};

/// Builds the instruction prompt for a language and query type
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Whether `language` has its own template
    pub fn has_template(language: Language) -> bool {
        matches!(language, Language::English | Language::Spanish)
    }

    pub fn build(&self, language: Language, query_type: QueryType) -> String {
        let template = match language {
            Language::Spanish => &SPANISH,
            _ => &ENGLISH,
        };

        let answer_in = format!(
            "The user is writing in {}. Write the whole answer in {}.",
            language.name(),
            language.name()
        );

        let mut rules = vec![template.only_what_asked, template.stay_focused];
        let focus = match query_type {
            QueryType::Exercise => Some(template.exercise_focus),
            QueryType::Nutrition => Some(template.nutrition_focus),
            QueryType::Recipe => Some(template.recipe_focus),
            QueryType::Training => Some(template.training_focus),
            QueryType::General => None,
        };
        rules.extend(focus);
        rules.push(template.simple_language);
        rules.push(template.same_language);
        if !Self::has_template(language) {
            rules.push(&answer_in);
        }

        let mut prompt = String::from(template.persona);
        for (i, rule) in rules.iter().enumerate() {
            prompt.push_str(&format!("\n{}. {}", i + 1, rule));
        }

        prompt.push_str("\n\n");
        prompt.push_str(if query_type == QueryType::General {
            template.general_header
        } else {
            template.focused_header
        });

        let sections = [
            (query_type.wants_exercise(), template.exercise_section),
            (query_type.wants_nutrition(), template.nutrition_section),
            (query_type.wants_macros(), template.macros_section),
            (query_type.wants_recipe(), template.recipe_section),
            (true, template.safety_section),
        ];
        for (_, section) in sections.iter().filter(|(wanted, _)| *wanted) {
            prompt.push('\n');
            prompt.push_str(section);
        }

        prompt
    }
}
