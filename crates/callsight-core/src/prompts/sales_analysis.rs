//! Sales-call analysis prompt: brand-mapping rules, the nine numbered sections,
//! the scoring rubric, and the mandatory markdown layout the parser relies on.

/// Instruction template sent with the call audio. Placeholders: `{company}` is the
/// manufacturer whose salesperson is on the call, `{representative}` describes the
/// rep. Every heading, entity marker, and field label below is mirrored by
/// `taxonomy`; edit them together or not at all.
pub const SALES_ANALYSIS_TEMPLATE: &str = r#"
CONFIGURATION

Manufacturer/Company: {company}
Sales Representative: {representative}

------------------------------------------------------------

CRITICAL INSTRUCTION - Brand Identification

1. {company}'s OWN Products
- "{company} brand"
- "Our product" / "Our company's product"
- If no brand is mentioned, assume it's {company}'s
- Do not repeat products if already mentioned

2. Competitor Brands - ALL other brand names mentioned in the conversation.

3. Online Retailers - Any online platforms mentioned (e.g., Amazon, Flipkart, BigBasket, etc.)

IMPORTANT: DO NOT assume a product is {company}'s unless explicitly stated!

------------------------------------------------------------

SPEAKER CONTEXT RULES (CRITICAL)

Before mapping brands and products, determine who is speaking:

- If the Sales Representative mentions a product, assume it is {company}'s product unless they clearly say it's a competitor.
- If the Customer (store owner) mentions a product or brand name, assume it is a competitor brand, unless the Sales Rep later confirms it belongs to {company}.
- If both speakers mention the same product name, assign ownership based on context and tone:
  - If Sales Rep is promoting or explaining -> {company}'s product.
  - If Customer is comparing or complaining -> Competitor product.
- When uncertain, label it as "Ambiguous - Needs context" and do not count it in {company} product analysis.

------------------------------------------------------------

Comprehensive Sales Analysis

Listen to this audio conversation and provide analysis without transcribing first.

IMPORTANT: Start directly with the analysis content. Do not include introductory phrases.

ANALYSIS RULES

- Extract ALL numeric data (quantities, prices, pack sizes, margins, discounts)
- Clearly separate {company} products from ALL competitor brands
- Note EVERY competitor brand name mentioned - don't group them generically
- Capture the customer's REAL reasons for preferences (not just what they say on surface)
- Identify psychological factors beyond price (brand loyalty, habit, risk aversion, etc.)
- Highlight cases where customer prefers competitor DESPITE {company} advantages
- Assess whether the salesperson understood the customer's true concerns
- Clearly identify the Salesperson and the Customer in the conversation before analysis
- The analysis report must be in English only
- Always cross-check the speaker before assigning brand ownership

------------------------------------------------------------

MANDATORY OUTPUT FORMAT - FOLLOW THIS EXACT STRUCTURE

You MUST follow this precise format. Do NOT write in paragraph style.

# Brand & Product Mapping

A. {company} Brand Products
- [Product 1]
- [Product 2]

B. Competitor Brands Mentioned
- [Brand Name]: [Product categories]

------------------------------------------------------------

# 1. Conversation Summary
- [Summary point 1]
- [Summary point 2]
- [Summary point 3]

------------------------------------------------------------

# 2. Sales Matrix

**{company} Products Performance**
- Products promoted: [Details]
- Volume pushed / upselling: [Details]
- Schemes offered: [Details with specifics: which product, discount %, free items]
- Cross-selling within {company} portfolio: [Details]
- Acceptance/Rejection: [Details]

**Sales Barriers**
- Objections raised: [Details]
- Competitor advantages cited: [Details]

------------------------------------------------------------

# 3. Customer Buying Patterns

A. Regularly buying products (Customer commits to buy BEFORE schemes OR shows clear intent regardless of schemes)
    - [Products List]

B. Scheme Based Orders (Customer commits to buy ONLY BECAUSE schemes influenced their decision)
    - [Products List - hesitation turned to purchase, or quantity increased due to schemes]

------------------------------------------------------------

# 4. Competitive Intelligence & Customer Psychology

A. Competitor Brand Analysis
For EACH competitor brand mentioned, document separately:

**Brand 1:**
- Brand Name: [Name]
- Products: [Categories]
- Customer's Current Status: [Does customer stock it? How much?]
- Reasons for Preference: [Why does customer prefer this brand over {company}, in detail]
- Category: Price Concern / Discount Concern / Product Variety / Product Package Size / Other factors
  IMPORTANT - Choose the Category only from the list above, do not change the list.

**Brand 2:** (Continue for each additional competitor brand mentioned until all are covered)
- Brand Name: [Name]
- Products: [Categories]
- Customer's Current Status: [Details]
- Reasons for Preference: [Details]
- Category: Price Concern / Discount Concern / Product Variety / Product Package Size / Other factors

B. Online Retailers Mentioned
For EACH online retailer mentioned, document separately:

**Retailer 1:**
- Name: [Name]
- Product Range: [What products do they offer?]
- Pricing Strategy: [How do their prices compare to {company}?]
- Customer Perception: [How do customers view this retailer?]
- Unique Selling Points: [What makes this retailer stand out?]

**Retailer 2:** (Continue for each additional online retailer mentioned until all are covered)
- Name: [Name]
- Product Range: [Details]
- Pricing Strategy: [Details]
- Customer Perception: [Details]
- Unique Selling Points: [Details]

C. Customer Buying Psychology
- What truly drives purchase decisions: [Ranked list]
- Customer's risk tolerance: [Details]
- Stock rotation preferences: [Details]
- Openness to switching brands: [Details]

------------------------------------------------------------

# 5. Salesperson Effectiveness Score

Score each component objectively against the rubric below.

IMPORTANT: If any criterion does not apply to this conversation (e.g., no competitor brands mentioned -> Competitor handling = N/A), then:
1. Mark that category as "N/A".
2. Give full score for that category.

**Product promotion (30% weight):** _/10
- 8-10: Presented 5+ {company} products with clear benefits and schemes
- 6-7: Presented 3-4 {company} products adequately
- 4-5: Presented 1-2 {company} products with limited detail
- 1-3: Minimal product presentation

**Scheme leverage (20% weight):** _/10
- 8-10: Actively promoted multiple schemes and free offers
- 6-7: Mentioned some schemes but didn't emphasize strongly
- 4-5: Basic mention of schemes without detail
- 1-3: No schemes mentioned or poorly explained

**Competitor handling (25% weight):** _/10
- 8-10: Directly addressed competitor advantages with counter-arguments
- 6-7: Acknowledged competitors but weak counter-positioning
- 4-5: Mentioned competitors but didn't address customer concerns
- 1-3: Failed to address competitive threats

**Customer psychology understanding (25% weight):** _/10
- 8-10: Clearly understood customer's priorities and adapted pitch accordingly
- 6-7: Showed some understanding of customer needs
- 4-5: Basic awareness of customer concerns
- 1-3: Poor understanding of what drives customer decisions

**Final Score Calculation:**
(Product promotion x 0.3) + (Scheme leverage x 0.2) + (Competitor handling x 0.25) + (Customer psychology x 0.25) = _/10

------------------------------------------------------------

# 6. Salesperson Ability Analysis
- [How the salesperson handled the conversation, objections, competitor mentions, and customer concerns]

------------------------------------------------------------

# 7. Product Price Analysis
- [{company} products the customer considers overpriced, with product, price point, and the customer's exact concerns]

------------------------------------------------------------

# 8. Salesperson Strengths
- [Strength 1]
- [Strength 2]
- [Strength 3]

------------------------------------------------------------

# 9. Areas for Improvement
- [Improvement 1]
- [Improvement 2]
- [Improvement 3]

------------------------------------------------------------

CRITICAL REMINDERS

- DO NOT assume any brand is {company} unless explicitly stated
- DO NOT group competitors as "other brands" - name each specifically
- DO capture both stated reasons AND underlying psychology
- DO identify non-price factors driving brand preference
- DO note when customer prefers a competitor despite {company} being cheaper or better
- FOLLOW THE EXACT FORMAT ABOVE - DO NOT DEVIATE TO PARAGRAPH STYLE
"#;

/// Build the analysis prompt for the given company identity.
pub fn sales_analysis_prompt(company: &str, representative: &str) -> String {
    SALES_ANALYSIS_TEMPLATE
        .replace("{company}", company)
        .replace("{representative}", representative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{CanonicalSection, ScoreCriterion, BRAND_CATEGORIES};

    /// The template and the taxonomy constants must never drift apart: the parser
    /// only recognizes what the prompt asks the model to echo.
    #[test]
    fn template_contains_every_canonical_title() {
        let prompt = sales_analysis_prompt("Naga", "Naga salesperson");
        for section in CanonicalSection::ALL {
            assert!(
                prompt.contains(section.title()),
                "template is missing section title: {}",
                section.title()
            );
        }
    }

    #[test]
    fn template_contains_every_criterion_and_weight() {
        for criterion in ScoreCriterion::ALL {
            assert!(SALES_ANALYSIS_TEMPLATE.contains(criterion.label()));
            let weight_pct = format!("({}% weight)", (criterion.weight() * 100.0).round() as u32);
            assert!(
                SALES_ANALYSIS_TEMPLATE.contains(&weight_pct),
                "missing weight marker {weight_pct}"
            );
        }
    }

    #[test]
    fn template_contains_category_vocabulary_and_entity_markers() {
        for category in BRAND_CATEGORIES {
            assert!(SALES_ANALYSIS_TEMPLATE.contains(category));
        }
        assert!(SALES_ANALYSIS_TEMPLATE.contains("**Brand 1:**"));
        assert!(SALES_ANALYSIS_TEMPLATE.contains("**Retailer 1:**"));
    }

    #[test]
    fn placeholders_are_fully_substituted() {
        let prompt = sales_analysis_prompt("Acme", "Acme field rep");
        assert!(!prompt.contains("{company}"));
        assert!(!prompt.contains("{representative}"));
        assert!(prompt.contains("Manufacturer/Company: Acme"));
        assert!(prompt.contains("Sales Representative: Acme field rep"));
    }
}
