//! Name generation utilities

use crate::components::Name;
use rand::Rng;

/// Generate a random name
pub fn generate_name(rng: &mut impl Rng) -> Name {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    let family = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];

    Name::new(given, family)
}

/// Generate a family name shared by one household
pub fn generate_family_name(rng: &mut impl Rng) -> &'static str {
    FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())]
}

/// Generate a given name for a member of a household
pub fn generate_given_name(rng: &mut impl Rng) -> &'static str {
    GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())]
}

/// Sign names for taverns
pub fn generate_tavern_name(rng: &mut impl Rng) -> String {
    format!("The {}", TAVERN_SIGNS[rng.gen_range(0..TAVERN_SIGNS.len())])
}

static GIVEN_NAMES: &[&str] = &[
    "Agnes", "Alice", "Beatrice", "Cecily", "Edith", "Emma", "Isabel", "Joan", "Margery", "Matilda",
    "Maud", "Rose", "Adam", "Geoffrey", "Gilbert", "Henry", "Hugh", "John", "Nicholas", "Ralph",
    "Richard", "Robert", "Roger", "Simon", "Thomas", "Walter", "William",
];

// Trade and place surnames
static FAMILY_NAMES: &[&str] = &[
    "Baker", "Brewer", "Carter", "Chandler", "Cooper", "Draper", "Fletcher", "Fuller", "Glover",
    "Mason", "Miller", "Potter", "Sawyer", "Smith", "Tanner", "Thatcher", "Turner", "Webb",
    "Atwood", "Brook", "Hill", "Marsh", "Underwood",
];

static TAVERN_SIGNS: &[&str] = &[
    "Swan", "Bell", "Green Man", "White Hart", "Plough", "Crown", "Bull", "Star",
];
