//! The `quizforge tags` command family.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Table};

use quizforge_core::tags::parse_tag_list;
use quizforge_core::{DomainResult, Tag, TagManagementService};

use super::{collect_json_files, load_draft};
use crate::config::load_config_from;

#[derive(Subcommand)]
pub enum TagsCommand {
    /// Known tags that look like the given name
    Similar {
        /// Tag name to look up
        input: String,

        /// Known tags (comma or space separated)
        #[arg(long)]
        tags: String,

        /// Minimum similarity, overriding the config
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Known tags containing (or contained in) a query
    Search {
        query: String,

        /// Known tags (comma or space separated)
        #[arg(long)]
        tags: String,
    },

    /// Group near-duplicate tags
    Cluster {
        /// Tags to cluster, in order (comma or space separated)
        #[arg(long)]
        tags: String,
    },

    /// Group `parent-child` tags under their parent
    Hierarchy {
        /// Tags to analyze (comma or space separated)
        #[arg(long)]
        tags: String,
    },

    /// Tag usage across problem drafts
    Usage {
        /// Problem draft file or directory
        #[arg(long)]
        problem: PathBuf,
    },

    /// Recommend tags for a problem from its title and description
    Recommend {
        /// Problem draft JSON
        #[arg(long)]
        problem: PathBuf,

        /// Candidate tags (comma or space separated)
        #[arg(long)]
        tags: String,
    },
}

fn parse_tags(raw: &str) -> Result<Vec<Tag>> {
    parse_tag_list(raw).context("invalid tag list")
}

pub fn execute(command: TagsCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    match command {
        TagsCommand::Similar {
            input,
            tags,
            threshold,
        } => {
            let mut tag_config = config.tags;
            if let Some(threshold) = threshold {
                tag_config.similarity_threshold = threshold;
            }
            let service = TagManagementService::new(tag_config);
            let suggestions = service.find_similar_tags(&input, &parse_tags(&tags)?);
            if suggestions.is_empty() {
                println!("No similar tags found.");
            }
            for s in suggestions {
                println!("{:<24} {:.2}", s.tag.name(), s.similarity);
            }
        }
        TagsCommand::Search { query, tags } => {
            let service = TagManagementService::new(config.tags);
            let found = service.search_tags(&query, &parse_tags(&tags)?);
            if found.is_empty() {
                println!("No matching tags.");
            }
            for tag in found {
                println!("{tag}");
            }
        }
        TagsCommand::Cluster { tags } => {
            let service = TagManagementService::new(config.tags);
            for cluster in service.cluster_similar_tags(&parse_tags(&tags)?) {
                let members: Vec<&str> = cluster.members.iter().map(Tag::name).collect();
                println!("[{}] {}", cluster.representative, members.join(", "));
            }
        }
        TagsCommand::Hierarchy { tags } => {
            let service = TagManagementService::new(config.tags);
            let groups = service.analyze_tag_hierarchy(&parse_tags(&tags)?);
            if groups.is_empty() {
                println!("No hierarchy found.");
            }
            for group in groups {
                let children: Vec<&str> = group.children.iter().map(Tag::name).collect();
                println!("{}: {}", group.parent, children.join(", "));
            }
        }
        TagsCommand::Usage { problem } => {
            let service = TagManagementService::new(config.tags);
            let mut lists = Vec::new();
            for file in collect_json_files(&problem)? {
                let draft = load_draft(&file)?;
                let tags = draft
                    .tags
                    .iter()
                    .map(Tag::new)
                    .collect::<DomainResult<Vec<_>>>()
                    .with_context(|| format!("invalid tags in {}", file.display()))?;
                lists.push(tags);
            }

            let usage = service.analyze_tag_usage(&lists);
            let mut table = Table::new();
            table.set_header(vec!["Tag", "Count", "Share"]);
            for u in &usage {
                table.add_row(vec![
                    Cell::new(&u.name),
                    Cell::new(u.count),
                    Cell::new(format!("{:.1}%", u.percentage)),
                ]);
            }
            println!("{} problem(s), {} distinct tag(s)", lists.len(), usage.len());
            println!("{table}");
        }
        TagsCommand::Recommend { problem, tags } => {
            let service = TagManagementService::new(config.tags);
            let draft = load_draft(&problem)?;
            let recommendations = service.recommend_tags(
                &draft.content.title,
                draft.content.description.as_deref(),
                &parse_tags(&tags)?,
            );
            if recommendations.is_empty() {
                println!("No recommendations.");
            }
            for r in recommendations {
                println!("{:<24} {}", r.tag.name(), r.score);
            }
        }
    }

    Ok(())
}
