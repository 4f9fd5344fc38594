//! Prompt construction for the assistant's two generations.

/// System prompt for the intent-classification call.
pub fn intent_prompt(site_name: &str) -> String {
    format!(
        "You are the shopping assistant for {site_name}, an online furniture store. \
         Classify the user's latest message. \
         Answer with exactly one word: \"product\" if the user is searching for, \
         asking about, or describing a product they want, or \"general\" for \
         anything else (greetings, store questions, small talk)."
    )
}

/// System prompt for the criteria-extraction generation.
///
/// Carries the live catalog vocabulary so the model maps free-form wording
/// onto real category and color names.
pub fn criteria_prompt(site_name: &str, categories: &[String], colors: &[String]) -> String {
    format!(
        "You are the product-search engine for {site_name}, an online furniture store. \
         Extract search criteria from the user's message and respond with a single \
         JSON object and nothing else. Use this shape:\n\
         {{\"product_search\": true, \"message\": \"<short confirmation for the user>\", \
         \"type\": \"<product kind or list>\", \"color\": \"<color or list>\", \
         \"category\": \"<category or list>\"}}\n\
         Available categories: {}.\n\
         Available colors: {}.\n\
         When the user does not constrain a field, answer \"any\" for it. \
         If the message is not actually a product search, respond with \
         {{\"product_search\": false, \"message\": \"<a helpful reply>\"}}.",
        categories.join(", "),
        colors.join(", "),
    )
}

/// System prompt for general conversation.
pub fn general_prompt(site_name: &str, categories: &[String]) -> String {
    format!(
        "You are a friendly shopping assistant for {site_name}, an online furniture \
         store carrying these categories: {}. \
         Answer the user helpfully and concisely. If they seem interested in a \
         product, invite them to describe what they are looking for.",
        categories.join(", "),
    )
}
