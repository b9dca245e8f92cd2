//! Stock model ids and where their weights are published.

/// Model ids offered by the stock model set.
pub const MODEL_IDS: [&str; 37] = [
    "cat",
    "dog",
    "bird",
    "butterfly",
    "flower",
    "face",
    "tree",
    "house",
    "car",
    "spider",
    "elephant",
    "lion",
    "tiger",
    "bear",
    "frog",
    "fish",
    "whale",
    "dolphin",
    "owl",
    "bee",
    "ant",
    "octopus",
    "crab",
    "lobster",
    "penguin",
    "flamingo",
    "parrot",
    "duck",
    "swan",
    "rabbit",
    "squirrel",
    "hedgehog",
    "pig",
    "sheep",
    "cow",
    "horse",
    "kangaroo",
];

const REMOTE_BASE: &str = "https://storage.googleapis.com/quickdraw-models/sketchRNN/large_models";

/// Whether `model_id` is part of the stock set.
pub fn is_known(model_id: &str) -> bool {
    MODEL_IDS.contains(&model_id)
}

/// Where the stock generative weights for `model_id` are published.
pub fn remote_url(model_id: &str) -> String {
    format!("{REMOTE_BASE}/{model_id}.gen.json")
}

/// `cat` -> `Cat`, for status display.
pub fn display_name(model_id: &str) -> String {
    let mut chars = model_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Stock ids as owned strings, e.g. for a randomize pool.
pub fn stock_pool() -> Vec<String> {
    MODEL_IDS.iter().map(|s| (*s).to_owned()).collect()
}
