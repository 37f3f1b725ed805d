//! Optional tuning parameters for rewrite and create-spin calls.
//!
//! Every field is optional. An absent field is left out of the request and
//! the service applies its own default.

use serde::{Deserialize, Serialize};

use crate::form::FormBody;
use crate::types::{PosMatch, Quality};

/// Words covered by one credit for a standard rewrite.
pub const STANDARD_WORDS_PER_CREDIT: usize = 5000;

/// Words covered by one credit for an advanced rewrite.
pub const ADVANCED_WORDS_PER_CREDIT: usize = 500;

/// Options for `ChimpRewrite`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteOptions {
    /// Synonym replacement quality.
    pub quality: Option<Quality>,
    /// Phrase replacement quality.
    pub phrase_quality: Option<Quality>,
    /// Required part-of-speech match.
    pub pos_match: Option<PosMatch>,
    /// Two-letter language code.
    pub language: Option<String>,
    /// Return plain rewritten text instead of spintax. The original word is
    /// always dropped in this mode.
    pub rewrite: Option<bool>,
    /// Advanced: rewrite whole sentences.
    pub sentence_rewrite: Option<bool>,
    /// Advanced: grammar-check the result.
    pub grammar_check: Option<bool>,
    pub replace_phrases_with_phrases: Option<bool>,
    pub reorder_paragraphs: Option<bool>,
    /// Fix a/an mistakes and repeated words left by phrase spinning.
    pub spin_tidy: Option<bool>,
    /// Spin every n-th word; 1 makes every word eligible.
    pub replace_frequency: Option<u32>,
    pub exclude_original: Option<bool>,
    /// Upper bound on synonyms per word or phrase.
    pub max_synonyms: Option<u32>,
    /// Spin inside spintax already present in the input.
    pub spin_within_spin: Option<bool>,
    /// Maximum nesting of the returned spintax, 0 for unlimited.
    pub max_spin_depth: Option<u32>,
    /// Instant-unique character substitution level.
    pub instant_unique: Option<i32>,
    /// Words or phrases left untouched.
    pub protected_terms: Vec<String>,
    /// Delimiter pairs whose content is left untouched; see `TagProtect`.
    pub tag_protect: Option<String>,
}

impl RewriteOptions {
    /// Whether any option billed at the advanced rate is switched on.
    pub fn is_advanced(&self) -> bool {
        self.sentence_rewrite == Some(true) || self.grammar_check == Some(true)
    }

    pub(crate) fn write_form(&self, form: &mut FormBody) {
        form.push_number("quality", self.quality.map(Quality::value));
        form.push_number("phrasequality", self.phrase_quality.map(Quality::value));
        form.push_number("posmatch", self.pos_match.map(PosMatch::value));
        form.push_text("language", self.language.as_deref());
        form.push_flag("rewrite", self.rewrite);
        form.push_flag("sentencerewrite", self.sentence_rewrite);
        form.push_flag("grammarcheck", self.grammar_check);
        form.push_flag("replacephraseswithphrases", self.replace_phrases_with_phrases);
        form.push_flag("reorderparagraphs", self.reorder_paragraphs);
        form.push_flag("spintidy", self.spin_tidy);
        form.push_number("replacefrequency", self.replace_frequency);
        form.push_flag("excludeoriginal", self.exclude_original);
        form.push_number("maxsyns", self.max_synonyms);
        form.push_flag("spinwithinspin", self.spin_within_spin);
        form.push_number("maxspindepth", self.max_spin_depth);
        form.push_number("instantunique", self.instant_unique);
        form.push_list("protectedterms", &self.protected_terms);
        form.push_text("tagprotect", self.tag_protect.as_deref());
    }
}

/// Options for `CreateSpin`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateSpinOptions {
    /// Never pick the first alternative of a spintax group.
    pub dont_include_original: Option<bool>,
    pub reorder_paragraphs: Option<bool>,
}

impl CreateSpinOptions {
    pub(crate) fn write_form(&self, form: &mut FormBody) {
        form.push_flag("dontincludeoriginal", self.dont_include_original);
        form.push_flag("reorderparagraphs", self.reorder_paragraphs);
    }
}

/// Builds a `tagprotect` value: start and end separated by `|`, pairs
/// separated by `,`.
///
/// ```
/// use chimp_core::TagProtect;
///
/// let spec = TagProtect::new().tag("[", "]").tag("begin", "end");
/// assert_eq!(spec.encode(), "[|],begin|end");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagProtect {
    pairs: Vec<(String, String)>,
}

impl TagProtect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.pairs.push((start.into(), end.into()));
        self
    }

    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(start, end)| format!("{start}|{end}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<TagProtect> for String {
    fn from(spec: TagProtect) -> Self {
        spec.encode()
    }
}

/// Credits the service documents for rewriting `text` with `options`,
/// rounded up. Text without a single word costs nothing.
pub fn estimate_credits(text: &str, options: &RewriteOptions) -> usize {
    let words = text.split_whitespace().count();
    let per_credit = if options.is_advanced() {
        ADVANCED_WORDS_PER_CREDIT
    } else {
        STANDARD_WORDS_PER_CREDIT
    };
    words.div_ceil(per_credit)
}
