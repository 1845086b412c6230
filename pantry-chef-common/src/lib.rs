pub mod meal;
pub mod pantry;
pub mod recipe;
pub mod user;

pub use meal::{AreaEntry, CategoryEntry, MealDetail, MealSummary};
pub use pantry::{PantryItem, ScannedIngredient};
pub use recipe::{
    InstructionStep, Nutrition, Recipe, RecipeDraft, RecipeIngredient, RecipeSuggestion,
    Substitution,
};
pub use user::{Tier, UserRecord};
