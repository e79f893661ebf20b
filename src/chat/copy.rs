//! Assistant and user copy used by the guided chat.

pub const GREETING: &str = "Is your room feeling 'unaesthetic'? Most Indian homes just need better logic, not more money. Upload a photo and let's rethink your space with honest, high-impact fixes.";

pub const RESET_GREETING: &str =
    "Truth starts with a fresh frame. Upload a new photo and let's optimize your next space.";

pub const BUDGET_PROMPT: &str =
    "Understood. What's a realistic budget you're aiming for? We'll prioritize the most impactful changes first.";

pub const MOOD_PROMPT: &str = "Perfect. And what kind of atmosphere or energy would you like this space to have?";

pub const ANALYZE_LOADING: &str = "Scanning for lighting flaws, wall opportunities, and layout hacks...";

pub const ANALYZE_SUMMARY: &str =
    "I've reviewed your room. Here's my honest take on how to transform it with high-impact, low-cost logic.";

pub const ANALYZE_APOLOGY: &str =
    "I had a bit of trouble reading the space. Could you try a clearer photo from another angle?";

pub const VISUALIZE_REQUEST: &str = "Show me a visual simulation.";

pub const VISUALIZE_LOADING: &str = "Simulating white walls, warm lighting, and greenery...";

pub const VISUALIZE_CAPTION: &str = "Here's the conceptual look. Notice how the space breathes when you swap tubelights for warm layers and refresh the walls.";

pub const VISUALIZE_FALLBACK: &str = "Visualization snagged, but the recommendations above are your real roadmap.";
