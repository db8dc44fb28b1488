use crate::geometry::{WallFlags, WallFunction, WallKind, WallMetadata};

/// Lowercased substring markers matched against wall names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: Vec<String>,
}

impl KeywordSet {
    /// Creates a set from the given words, trimmed and lowercased.
    ///
    /// Empty entries and duplicates are dropped.
    #[must_use]
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for word in words {
            set.push(word.as_ref());
        }
        set
    }

    /// Built-in defaults followed by user-supplied additions.
    #[must_use]
    pub fn merged(defaults: &[&str], custom: &[String]) -> Self {
        let mut set = Self::new(defaults);
        for word in custom {
            set.push(word);
        }
        set
    }

    fn push(&mut self, word: &str) {
        let word = word.trim().to_lowercase();
        if !word.is_empty() && !self.words.contains(&word) {
            self.words.push(word);
        }
    }

    /// Returns `true` if any keyword occurs in `text`, which must already
    /// be lowercased.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        !text.is_empty() && self.words.iter().any(|w| text.contains(w.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Thresholds and keyword lists for wall classification.
#[derive(Debug, Clone, Default)]
pub struct ClassifierRules {
    pub exterior_by_geometry: bool,
    pub exterior_requires_openings: bool,
    pub exterior_min_segment: f64,
    pub exterior_min_opening_width: f64,
    pub exterior_keywords: KeywordSet,
    pub facade_keywords: KeywordSet,
    pub monolith_keywords: KeywordSet,
    pub structural_keywords: KeywordSet,
    pub curtain_keywords: KeywordSet,
}

/// What the classifier knows about the boundary segment being walked.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryContext<'a> {
    /// Whether the segment lies on the outer building boundary, if known.
    pub on_outer_boundary: Option<bool>,
    pub segment_length: f64,
    /// Usable widths of the wall's openings that project onto this segment.
    pub opening_widths: &'a [f64],
}

/// Derives [`WallFlags`] from explicit wall metadata.
#[derive(Debug, Clone, Copy)]
pub struct WallClassifier<'a> {
    rules: &'a ClassifierRules,
}

impl<'a> WallClassifier<'a> {
    #[must_use]
    pub fn new(rules: &'a ClassifierRules) -> Self {
        Self { rules }
    }

    /// Classifies a wall. Unknown metadata sets no flags.
    #[must_use]
    pub fn classify(&self, meta: &WallMetadata, ctx: &BoundaryContext<'_>) -> WallFlags {
        let rules = self.rules;
        let text = meta.search_text();
        let mut flags = WallFlags::empty();

        let exterior = meta.function == Some(WallFunction::Exterior)
            || rules.exterior_keywords.matches(&text)
            || self.exterior_by_geometry(ctx);
        flags.set(WallFlags::EXTERIOR, exterior);
        flags.set(WallFlags::FACADE, rules.facade_keywords.matches(&text));
        flags.set(WallFlags::MONOLITH, rules.monolith_keywords.matches(&text));
        flags.set(
            WallFlags::STRUCTURAL,
            meta.structural_usage == Some(true) || rules.structural_keywords.matches(&text),
        );
        flags.set(
            WallFlags::CURTAIN,
            meta.kind == WallKind::Curtain || rules.curtain_keywords.matches(&text),
        );
        flags
    }

    fn exterior_by_geometry(&self, ctx: &BoundaryContext<'_>) -> bool {
        let rules = self.rules;
        if !rules.exterior_by_geometry || ctx.on_outer_boundary != Some(true) {
            return false;
        }
        if ctx.segment_length < rules.exterior_min_segment {
            return false;
        }
        if rules.exterior_requires_openings {
            return ctx
                .opening_widths
                .iter()
                .any(|w| *w > rules.exterior_min_opening_width);
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::WallId;

    fn rules() -> ClassifierRules {
        ClassifierRules {
            exterior_by_geometry: true,
            exterior_requires_openings: true,
            exterior_min_segment: 500.0,
            exterior_min_opening_width: 0.0,
            exterior_keywords: KeywordSet::new(["наруж", "nr_", "exterior"]),
            facade_keywords: KeywordSet::new(["фасад", "nr_"]),
            monolith_keywords: KeywordSet::new(["кж", "монолит", "concrete"]),
            structural_keywords: KeywordSet::new(["несущ"]),
            curtain_keywords: KeywordSet::new(["curtain", "витраж"]),
        }
    }

    fn ctx(outer: Option<bool>, len: f64, widths: &[f64]) -> BoundaryContext<'_> {
        BoundaryContext {
            on_outer_boundary: outer,
            segment_length: len,
            opening_widths: widths,
        }
    }

    #[test]
    fn keyword_set_trims_and_dedupes() {
        let set = KeywordSet::merged(&["кж", " КЖ "], &[String::new(), "Beton".to_owned()]);
        assert_eq!(set.len(), 2);
        assert!(set.matches("стена beton 200"));
        assert!(!set.matches(""));
    }

    #[test]
    fn monolith_by_type_name() {
        let r = rules();
        let meta = WallMetadata::new(WallId(1), "КЖ_Стена 200", 200.0);
        let flags = WallClassifier::new(&r).classify(&meta, &ctx(None, 3000.0, &[]));
        assert_eq!(flags, WallFlags::MONOLITH);
    }

    #[test]
    fn exterior_by_function_and_name() {
        let r = rules();
        let mut meta = WallMetadata::new(WallId(2), "Кирпич 250", 250.0);
        meta.function = Some(WallFunction::Exterior);
        let c = WallClassifier::new(&r);
        assert!(c.classify(&meta, &ctx(None, 1.0, &[])).contains(WallFlags::EXTERIOR));

        let named = WallMetadata::new(WallId(3), "NR_Brick", 250.0);
        let flags = c.classify(&named, &ctx(None, 1.0, &[]));
        assert!(flags.contains(WallFlags::EXTERIOR | WallFlags::FACADE));
    }

    #[test]
    fn geometric_exterior_needs_opening_and_length() {
        let r = rules();
        let c = WallClassifier::new(&r);
        let meta = WallMetadata::new(WallId(4), "Перегородка", 100.0);

        let with_door = c.classify(&meta, &ctx(Some(true), 1200.0, &[900.0]));
        assert!(with_door.contains(WallFlags::EXTERIOR));

        let short = c.classify(&meta, &ctx(Some(true), 400.0, &[900.0]));
        assert!(short.is_empty());

        let no_openings = c.classify(&meta, &ctx(Some(true), 1200.0, &[]));
        assert!(no_openings.is_empty());

        let inner = c.classify(&meta, &ctx(Some(false), 1200.0, &[900.0]));
        assert!(inner.is_empty());
    }

    #[test]
    fn curtain_and_structural() {
        let r = rules();
        let c = WallClassifier::new(&r);
        let mut meta = WallMetadata::new(WallId(5), "Glazing", 50.0);
        meta.kind = WallKind::Curtain;
        assert!(c.classify(&meta, &ctx(None, 1.0, &[])).contains(WallFlags::CURTAIN));

        let mut bearing = WallMetadata::new(WallId(6), "Кладка", 380.0);
        bearing.structural_usage = Some(true);
        assert_eq!(
            c.classify(&bearing, &ctx(None, 1.0, &[])),
            WallFlags::STRUCTURAL
        );
    }

    #[test]
    fn missing_metadata_is_permissive() {
        let r = rules();
        let meta = WallMetadata::default();
        let flags = WallClassifier::new(&r).classify(&meta, &ctx(None, 0.0, &[]));
        assert!(flags.is_empty());
    }
}
