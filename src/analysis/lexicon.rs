//! Pluggable domain lexicons.
//!
//! A lexicon maps trigger tokens found in the persona text to seed
//! inclusion/exclusion terms and relevance boosts. The extractor itself
//! knows no domain vocabulary; callers inject a lexicon, and
//! [`DomainLexicon::empty`] turns the mechanism off.

/// One trigger and what it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconEntry {
    /// Token that activates the entry (exact, lowercase)
    pub trigger: String,
    /// Terms content should mention
    pub include: Vec<String>,
    /// Terms content must not mention
    pub exclude: Vec<String>,
    /// Terms whose presence raises relevance
    pub boost_terms: Vec<String>,
    /// Added to title context score when a boost term appears
    pub title_boost: f32,
    /// Added to content relevance when a boost term appears
    pub content_boost: f32,
}

impl LexiconEntry {
    /// Create an entry with no seeds.
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into().to_lowercase(),
            include: Vec::new(),
            exclude: Vec::new(),
            boost_terms: Vec::new(),
            title_boost: 0.0,
            content_boost: 0.0,
        }
    }

    /// Set inclusion seeds.
    pub fn with_include(mut self, terms: &[&str]) -> Self {
        self.include = to_owned_lower(terms);
        self
    }

    /// Set exclusion seeds.
    pub fn with_exclude(mut self, terms: &[&str]) -> Self {
        self.exclude = to_owned_lower(terms);
        self
    }

    /// Set boost terms and their weights.
    pub fn with_boost(mut self, terms: &[&str], title_boost: f32, content_boost: f32) -> Self {
        self.boost_terms = to_owned_lower(terms);
        self.title_boost = title_boost;
        self.content_boost = content_boost;
        self
    }
}

fn to_owned_lower(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

/// An ordered table of lexicon entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainLexicon {
    entries: Vec<LexiconEntry>,
}

const VEGETARIAN_EXCLUDE: &[&str] = &[
    "egg", "eggs", "meat", "fish", "chicken", "beef", "pork", "seafood",
];
const VEGAN_EXTRA_EXCLUDE: &[&str] = &["dairy", "milk", "cheese", "butter"];
const MEAT_TERMS: &[&str] = &[
    "meat", "chicken", "beef", "pork", "fish", "seafood", "lamb", "turkey",
];
const MEAT_BOOST_TERMS: &[&str] = &[
    "meat", "chicken", "beef", "pork", "fish", "seafood", "lamb", "turkey", "bacon", "salmon",
    "tuna", "bourguignon", "steak",
];
const PLANT_BOOST_TERMS: &[&str] = &[
    "vegetable", "vegetables", "veggie", "salad", "bean", "beans", "lentil", "lentils", "quinoa",
    "tofu", "chickpea", "chickpeas", "hummus",
];

impl DomainLexicon {
    /// A lexicon with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The dietary table: `vegetarian`, `vegan`, `non-vegetarian`.
    pub fn dietary() -> Self {
        let vegan_exclude: Vec<&str> = VEGETARIAN_EXCLUDE
            .iter()
            .chain(VEGAN_EXTRA_EXCLUDE)
            .copied()
            .collect();

        Self::empty()
            .with_entry(
                LexiconEntry::new("vegetarian")
                    .with_exclude(VEGETARIAN_EXCLUDE)
                    .with_boost(PLANT_BOOST_TERMS, 0.6, 0.3),
            )
            .with_entry(
                LexiconEntry::new("vegan")
                    .with_exclude(&vegan_exclude)
                    .with_boost(PLANT_BOOST_TERMS, 0.6, 0.3),
            )
            .with_entry(
                LexiconEntry::new("non-vegetarian")
                    .with_include(MEAT_TERMS)
                    .with_boost(MEAT_BOOST_TERMS, 0.8, 0.3),
            )
    }

    /// Append an entry.
    pub fn with_entry(mut self, entry: LexiconEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// All entries in order.
    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    /// Check if the lexicon has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose trigger equals one of `tokens`.
    pub fn matching<'a>(&'a self, tokens: &'a [String]) -> impl Iterator<Item = &'a LexiconEntry> {
        self.entries
            .iter()
            .filter(move |entry| tokens.iter().any(|t| *t == entry.trigger))
    }

    /// Whether a token is the trigger of some entry.
    pub fn is_trigger(&self, token: &str) -> bool {
        self.entries.iter().any(|entry| entry.trigger == token)
    }
}
