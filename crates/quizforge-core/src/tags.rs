//! Tag curation: fuzzy matching, usage analysis, recommendation,
//! clustering and hierarchy inference.
//!
//! The free functions take their options explicitly. [`TagManagementService`]
//! binds them to a [`TagManagementConfig`] and is what callers hold, usually
//! behind the [`TagCurator`] trait.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::config::TagManagementConfig;
use crate::error::{DomainError, DomainResult};
use crate::tag::Tag;
use crate::validation::normalize_default;

/// A candidate tag close to some input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSuggestion {
    pub tag: Tag,
    pub similarity: f64,
}

/// How often a tag name occurs across problems.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagUsage {
    pub name: String,
    pub count: usize,
    /// Share of all tag occurrences, 0 to 100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRecommendation {
    pub tag: Tag,
    pub score: u32,
}

/// Tags grouped around the seed they were absorbed into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCluster {
    pub representative: Tag,
    /// Every member, the representative first.
    pub members: Vec<Tag>,
}

/// Multi-segment tags (`algebra-linear`) grouped under their first segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagHierarchy {
    pub parent: String,
    pub children: Vec<Tag>,
}

/// Edit distance with unit insert, delete and substitute costs, over chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - distance / max_len` over normalized text; 1 when both are empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_default(a);
    let b = normalize_default(b);
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(&a, &b) as f64 / max_len as f64
}

/// Candidates at least `threshold` similar to `input`, most similar first.
pub fn find_similar_tags(
    input: &str,
    candidates: &[Tag],
    threshold: f64,
    max_suggestions: usize,
) -> Vec<TagSuggestion> {
    let input = normalize_default(input);
    if input.is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<TagSuggestion> = candidates
        .iter()
        .map(|tag| TagSuggestion {
            tag: tag.clone(),
            similarity: similarity(&input, tag.name()),
        })
        .filter(|s| s.similarity >= threshold)
        .collect();
    suggestions.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.tag.cmp(&b.tag))
    });
    suggestions.truncate(max_suggestions);
    suggestions
}

/// Count each tag name across the problems' tag lists.
///
/// Percentages are relative to all occurrences, including names later
/// filtered out by `min_usage_count`. Sorted by count, then name.
pub fn analyze_tag_usage(problem_tags: &[Vec<Tag>], min_usage_count: usize) -> Vec<TagUsage> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total = 0usize;
    for tag in problem_tags.iter().flatten() {
        *counts.entry(tag.name()).or_default() += 1;
        total += 1;
    }

    let mut usage: Vec<TagUsage> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_usage_count)
        .map(|(name, count)| TagUsage {
            name: name.to_string(),
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();
    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    usage
}

/// Split lower-cased text into alphanumeric runs of at least `min_len` chars.
///
/// `char::is_alphanumeric` covers Hangul syllables as well as Latin letters.
fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && t.chars().count() >= min_len)
        .map(String::from)
        .collect()
}

/// Score candidates against a problem's title and description.
///
/// A candidate earns 3 when its full name occurs in the text, and 1 for
/// every token and name segment where one contains the other.
pub fn recommend_tags(
    title: &str,
    description: Option<&str>,
    candidates: &[Tag],
    max_recommendations: usize,
    min_word_length: usize,
) -> Vec<TagRecommendation> {
    let text = normalize_default(&format!("{title} {}", description.unwrap_or_default()));
    let tokens = tokenize(&text, min_word_length);

    let mut recommendations: Vec<TagRecommendation> = candidates
        .iter()
        .filter_map(|tag| {
            let mut score = 0u32;
            if text.contains(tag.name()) {
                score += 3;
            }
            for segment in tag.name().split(['-', '_']).filter(|s| !s.is_empty()) {
                for token in &tokens {
                    if token.contains(segment) || segment.contains(token.as_str()) {
                        score += 1;
                    }
                }
            }
            (score > 0).then(|| TagRecommendation {
                tag: tag.clone(),
                score,
            })
        })
        .collect();
    recommendations.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.tag.cmp(&b.tag)));
    recommendations.truncate(max_recommendations);
    recommendations
}

/// Drop repeated names (first occurrence wins) and enforce the limit.
pub fn normalize_tag_set(tags: &[Tag], max_tags_per_problem: usize) -> DomainResult<Vec<Tag>> {
    let mut seen = HashSet::new();
    let unique: Vec<Tag> = tags
        .iter()
        .filter(|tag| !tag.name().is_empty() && seen.insert(tag.name().to_string()))
        .cloned()
        .collect();

    debug!(
        input = tags.len(),
        unique = unique.len(),
        max = max_tags_per_problem,
        "normalized tag set"
    );

    if unique.len() > max_tags_per_problem {
        return Err(DomainError::TagLimitExceeded {
            count: unique.len(),
            max: max_tags_per_problem,
        });
    }
    Ok(unique)
}

/// Parse comma or whitespace separated tag names. Blank entries are skipped.
pub fn parse_tag_list(raw: &str) -> DomainResult<Vec<Tag>> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.trim().is_empty())
        .map(Tag::new)
        .collect()
}

/// Candidates whose name contains the query, or that the query contains.
pub fn search_tags(
    query: &str,
    candidates: &[Tag],
    case_sensitive: bool,
    max_search_results: usize,
) -> Vec<Tag> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let query = if case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };

    candidates
        .iter()
        .filter(|tag| tag.name().contains(query.as_str()) || query.contains(tag.name()))
        .take(max_search_results)
        .cloned()
        .collect()
}

/// Greedy single-linkage clustering over input order.
///
/// Each unprocessed tag seeds a cluster and absorbs every later unprocessed
/// tag at least `threshold` similar to it. The clusters partition the input;
/// a different input order can give different clusters.
pub fn cluster_similar_tags(tags: &[Tag], enable_clustering: bool, threshold: f64) -> Vec<TagCluster> {
    if !enable_clustering {
        return tags
            .iter()
            .map(|tag| TagCluster {
                representative: tag.clone(),
                members: vec![tag.clone()],
            })
            .collect();
    }

    let mut processed = vec![false; tags.len()];
    let mut clusters = Vec::new();
    for (i, seed) in tags.iter().enumerate() {
        if processed[i] {
            continue;
        }
        processed[i] = true;
        let mut members = vec![seed.clone()];
        for (j, other) in tags.iter().enumerate().skip(i + 1) {
            if !processed[j] && similarity(seed.name(), other.name()) >= threshold {
                processed[j] = true;
                members.push(other.clone());
            }
        }
        clusters.push(TagCluster {
            representative: seed.clone(),
            members,
        });
    }
    clusters
}

/// Group `-` separated names under their first segment, in first-seen order.
pub fn analyze_tag_hierarchy(tags: &[Tag], enable_hierarchy_analysis: bool) -> Vec<TagHierarchy> {
    if !enable_hierarchy_analysis {
        return Vec::new();
    }

    let mut groups: Vec<TagHierarchy> = Vec::new();
    for tag in tags {
        let segments: Vec<&str> = tag.name().split('-').collect();
        if segments.len() < 2 || segments[0].is_empty() {
            continue;
        }
        let parent = segments[0];
        match groups.iter_mut().find(|g| g.parent == parent) {
            Some(group) => {
                if !group.children.contains(tag) {
                    group.children.push(tag.clone());
                }
            }
            None => groups.push(TagHierarchy {
                parent: parent.to_string(),
                children: vec![tag.clone()],
            }),
        }
    }
    groups
}

/// What the rest of the system needs from tag curation.
pub trait TagCurator {
    /// Deduplicate and enforce the per-problem limit.
    fn normalize_tags(&self, tags: &[Tag]) -> DomainResult<Vec<Tag>>;

    fn suggest_similar(&self, input: &str, candidates: &[Tag]) -> Vec<TagSuggestion>;

    fn recommend(
        &self,
        title: &str,
        description: Option<&str>,
        candidates: &[Tag],
    ) -> Vec<TagRecommendation>;
}

/// Tag operations bound to one [`TagManagementConfig`].
#[derive(Debug, Clone, Default)]
pub struct TagManagementService {
    config: TagManagementConfig,
}

impl TagManagementService {
    pub fn new(config: TagManagementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TagManagementConfig {
        &self.config
    }

    pub fn find_similar_tags(&self, input: &str, candidates: &[Tag]) -> Vec<TagSuggestion> {
        find_similar_tags(
            input,
            candidates,
            self.config.similarity_threshold,
            self.config.max_suggestions,
        )
    }

    pub fn analyze_tag_usage(&self, problem_tags: &[Vec<Tag>]) -> Vec<TagUsage> {
        analyze_tag_usage(problem_tags, self.config.min_usage_count)
    }

    pub fn recommend_tags(
        &self,
        title: &str,
        description: Option<&str>,
        candidates: &[Tag],
    ) -> Vec<TagRecommendation> {
        recommend_tags(
            title,
            description,
            candidates,
            self.config.max_recommendations,
            self.config.min_word_length,
        )
    }

    pub fn normalize_tag_set(&self, tags: &[Tag]) -> DomainResult<Vec<Tag>> {
        normalize_tag_set(tags, self.config.max_tags_per_problem)
    }

    pub fn search_tags(&self, query: &str, candidates: &[Tag]) -> Vec<Tag> {
        search_tags(
            query,
            candidates,
            self.config.case_sensitive,
            self.config.max_search_results,
        )
    }

    pub fn cluster_similar_tags(&self, tags: &[Tag]) -> Vec<TagCluster> {
        cluster_similar_tags(
            tags,
            self.config.enable_clustering,
            self.config.levenshtein_similarity_threshold,
        )
    }

    pub fn analyze_tag_hierarchy(&self, tags: &[Tag]) -> Vec<TagHierarchy> {
        analyze_tag_hierarchy(tags, self.config.enable_hierarchy_analysis)
    }
}

impl TagCurator for TagManagementService {
    fn normalize_tags(&self, tags: &[Tag]) -> DomainResult<Vec<Tag>> {
        self.normalize_tag_set(tags)
    }

    fn suggest_similar(&self, input: &str, candidates: &[Tag]) -> Vec<TagSuggestion> {
        self.find_similar_tags(input, candidates)
    }

    fn recommend(
        &self,
        title: &str,
        description: Option<&str>,
        candidates: &[Tag],
    ) -> Vec<TagRecommendation> {
        self.recommend_tags(title, description, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn tags(names: &[&str]) -> Vec<Tag> {
        names.iter().map(|n| Tag::new(n).unwrap()).collect()
    }

    fn names(tags: &[Tag]) -> Vec<&str> {
        tags.iter().map(Tag::name).collect()
    }

    #[test_case("kitten", "sitting", 3; "classic")]
    #[test_case("", "abc", 3; "empty left")]
    #[test_case("abc", "", 3; "empty right")]
    #[test_case("same", "same", 0; "identical")]
    #[test_case("수학", "수학과", 1; "hangul insertion")]
    fn distance(a: &str, b: &str, expected: usize) {
        assert_eq!(levenshtein_distance(a, b), expected);
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("math", "math"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abcd", "wxyz"), 0.0);
        assert_eq!(similarity("MATH", "math"), 1.0);
        assert_eq!(similarity("abcd", "abce"), 0.75);
    }

    #[test]
    fn similar_tags_exact_first_and_threshold() {
        let candidates = tags(&["영어", "수학과", "수학", "과학"]);
        let found = find_similar_tags("수학", &candidates, 0.5, 5);
        assert_eq!(found[0].tag.name(), "수학");
        assert_eq!(found[0].similarity, 1.0);
        assert!(found.iter().all(|s| s.similarity >= 0.5));
        assert!(!found.iter().any(|s| s.tag.name() == "영어"));
        assert!(find_similar_tags("   ", &candidates, 0.0, 5).is_empty());
    }

    #[test]
    fn similar_tags_truncate() {
        let candidates = tags(&["math", "maths", "mathe", "matt"]);
        assert_eq!(find_similar_tags("math", &candidates, 0.5, 2).len(), 2);
    }

    #[test]
    fn usage_counts_and_percentages() {
        let lists = vec![
            tags(&["math", "algebra"]),
            tags(&["math", "geometry"]),
            tags(&["math"]),
        ];
        let usage = analyze_tag_usage(&lists, 1);
        assert_eq!(usage[0].name, "math");
        assert_eq!(usage[0].count, 3);
        assert_eq!(usage[0].percentage, 60.0);
        assert_eq!(usage[1].name, "algebra");

        let frequent = analyze_tag_usage(&lists, 2);
        assert_eq!(frequent.len(), 1);
        assert!(analyze_tag_usage(&[], 1).is_empty());
    }

    #[test]
    fn recommendations_rank_full_name_matches() {
        let candidates = tags(&["algebra", "linear-algebra", "history", "수학"]);
        let recs = recommend_tags(
            "Linear algebra basics",
            Some("Solve a 수학 problem"),
            &candidates,
            5,
            2,
        );
        let ranked: Vec<&str> = recs.iter().map(|r| r.tag.name()).collect();
        assert!(!ranked.contains(&"history"));
        // "linear algebra" is not "linear-algebra", but both segments match tokens.
        assert_eq!(recs[0].tag.name(), "algebra");
        assert_eq!(recs[0].score, 4);
        assert!(ranked.contains(&"수학"));
        assert!(recommend_tags("Linear algebra", None, &candidates, 1, 2).len() == 1);
    }

    #[test]
    fn tag_set_dedupes_and_limits() {
        let input = tags(&["Math", "math", "algebra"]);
        assert_eq!(names(&normalize_tag_set(&input, 10).unwrap()), ["math", "algebra"]);
        let err = normalize_tag_set(&input, 1).unwrap_err();
        assert_eq!(err, DomainError::TagLimitExceeded { count: 2, max: 1 });
    }

    #[test]
    fn parse_list() {
        let parsed = parse_tag_list("math, Algebra  geometry,,").unwrap();
        assert_eq!(names(&parsed), ["math", "algebra", "geometry"]);
        assert!(parse_tag_list("ok, not!ok").is_err());
        assert!(parse_tag_list(" , ").unwrap().is_empty());
    }

    #[test]
    fn search_both_directions() {
        let candidates = tags(&["algebra", "linear-algebra", "alg", "history"]);
        assert_eq!(
            names(&search_tags("ALGEBRA", &candidates, false, 10)),
            ["algebra", "linear-algebra", "alg"]
        );
        assert!(search_tags("ALGEBRA", &candidates, true, 10).is_empty());
        assert!(search_tags("  ", &candidates, false, 10).is_empty());
        assert_eq!(search_tags("alg", &candidates, false, 1).len(), 1);
    }

    #[test]
    fn clusters_partition_input() {
        let input = tags(&["math", "maths", "history", "histories", "math", "art"]);
        let clusters = cluster_similar_tags(&input, true, 0.7);
        let flattened: Vec<Tag> = clusters.iter().flat_map(|c| c.members.clone()).collect();
        let mut sorted_in = input.clone();
        let mut sorted_out = flattened;
        sorted_in.sort();
        sorted_out.sort();
        assert_eq!(sorted_in, sorted_out);
        assert_eq!(names(&clusters[0].members), ["math", "maths", "math"]);
    }

    #[test]
    fn clustering_disabled_gives_singletons() {
        let input = tags(&["math", "maths"]);
        let clusters = cluster_similar_tags(&input, false, 0.1);
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.members.len() == 1));
    }

    #[test]
    fn hierarchy_groups_by_first_segment() {
        let input = tags(&["math-algebra", "math-geometry", "science-physics", "plain", "math-algebra"]);
        let tree = analyze_tag_hierarchy(&input, true);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].parent, "math");
        assert_eq!(names(&tree[0].children), ["math-algebra", "math-geometry"]);
        assert_eq!(tree[1].parent, "science");
        assert!(analyze_tag_hierarchy(&input, false).is_empty());
    }

    #[test]
    fn service_uses_config() {
        let service = TagManagementService::new(TagManagementConfig {
            max_tags_per_problem: 2,
            ..TagManagementConfig::default()
        });
        let curator: &dyn TagCurator = &service;
        assert!(curator.normalize_tags(&tags(&["a1", "b1", "c1"])).is_err());
        assert_eq!(curator.normalize_tags(&tags(&["a1", "A1", "b1"])).unwrap().len(), 2);
    }
}
