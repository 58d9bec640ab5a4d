//! Read-only opportunity commands: list, show, stats, report, export.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use oppfinder_core::{
    Opportunity, OpportunityQuery, OpportunityRecord, OpportunityRepository, OpportunityStats,
};

const TITLE_WIDTH: usize = 40;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width).collect::<String>())
    } else {
        text.to_string()
    }
}

fn id_label(opportunity: &Opportunity) -> String {
    opportunity
        .id()
        .map_or_else(|| "-".to_string(), |id| id.to_string())
}

/// Fixed-width table, one row per opportunity.
pub(crate) fn render_table(opportunities: &[Opportunity]) -> String {
    let mut out = format!(
        "{:<6}{:<7}{:<46}{:<16}{:<10}RECOMMENDATION\n",
        "ID", "SCORE", "TITLE", "REVENUE", "COMP."
    );
    for o in opportunities {
        let _ = writeln!(
            out,
            "{:<6}{:<7}{:<46}{:<16}{:<10}{}",
            id_label(o),
            o.score(),
            truncate(o.title(), TITLE_WIDTH),
            o.revenue(),
            o.competition_level(),
            o.recommendation()
        );
    }
    out
}

pub(crate) fn render_detail(o: &Opportunity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", id_label(o), o.title());
    let _ = writeln!(out, "Problem:        {}", o.problem());
    let _ = writeln!(out, "Score:          {}/100", o.score());
    let _ = writeln!(out, "Recommendation: {}", o.recommendation());
    let _ = writeln!(out, "Validated:      {}", if o.validated() { "yes" } else { "no" });
    let _ = writeln!(out, "Mentions:       {}", o.mentions());
    let _ = writeln!(out, "Revenue:        {}", o.revenue());
    let _ = writeln!(
        out,
        "Competition:    {} ({} competitors)",
        o.competition_level(),
        o.competitors()
    );
    let _ = writeln!(out, "Build:          {}", o.build_complexity());
    let _ = writeln!(out, "Market size:    {}", o.market_size());
    let _ = writeln!(out, "Example:        {}", o.example());
    let _ = writeln!(out, "Sources:        {}", o.sources().join(", "));
    let _ = writeln!(
        out,
        "Found:          {}",
        o.created_at().format("%Y-%m-%d %H:%M UTC")
    );
    out
}

pub(crate) fn render_stats(stats: &OpportunityStats) -> String {
    format!(
        "total:      {}\nvalidated:  {}\nhigh score: {}\navg score:  {}\n",
        stats.total, stats.validated, stats.high_score, stats.avg_score
    )
}

/// Markdown report of `top`, which callers pass already ranked.
pub(crate) fn render_report(top: &[Opportunity], generated: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Opportunity Report");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Generated**: {}",
        generated.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "**Opportunities**: {}", top.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "---");

    for (rank, o) in top.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}. {} ({}/100)", rank + 1, o.title(), o.score());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", o.problem());
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "**Revenue**: {} | **Competition**: {} | **Recommendation**: {}",
            o.revenue(),
            o.competition_level(),
            o.recommendation()
        );
    }
    out
}

pub(crate) fn export_json(opportunities: &[Opportunity]) -> serde_json::Result<String> {
    let records: Vec<OpportunityRecord> = opportunities.iter().map(Opportunity::to_record).collect();
    serde_json::to_string_pretty(&records)
}

/// List stored opportunities matching `query`.
///
/// # Errors
///
/// Returns an error if the repository query fails.
pub(crate) async fn run_list(
    repo: &dyn OpportunityRepository,
    query: &OpportunityQuery,
) -> anyhow::Result<()> {
    let rows = query.apply(repo.get_all().await?);
    if rows.is_empty() {
        println!("no opportunities found; run `scan` first");
        return Ok(());
    }
    print!("{}", render_table(&rows));
    Ok(())
}

/// Print one opportunity in full.
///
/// # Errors
///
/// Returns an error if the id is unknown or the repository query fails.
pub(crate) async fn run_show(repo: &dyn OpportunityRepository, id: i64) -> anyhow::Result<()> {
    let opportunity = repo
        .get(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("opportunity {id} not found"))?;
    print!("{}", render_detail(&opportunity));
    Ok(())
}

/// # Errors
///
/// Returns an error if the repository query fails.
pub(crate) async fn run_stats(repo: &dyn OpportunityRepository) -> anyhow::Result<()> {
    let all = repo.get_all().await?;
    print!("{}", render_stats(&OpportunityStats::from_opportunities(&all)));
    Ok(())
}

/// Print a markdown report of the `limit` highest-scoring opportunities.
///
/// # Errors
///
/// Returns an error if the repository query fails.
pub(crate) async fn run_report(repo: &dyn OpportunityRepository, limit: usize) -> anyhow::Result<()> {
    let query = OpportunityQuery {
        limit: Some(limit),
        ..OpportunityQuery::default()
    };
    let top = query.apply(repo.get_all().await?);
    if top.is_empty() {
        println!("no opportunities to report");
        return Ok(());
    }
    print!("{}", render_report(&top, Utc::now()));
    Ok(())
}

/// Write matching opportunities to `path` as pretty-printed JSON records.
///
/// # Errors
///
/// Returns an error if the repository query, serialization, or file write fails.
pub(crate) async fn run_export(
    repo: &dyn OpportunityRepository,
    path: &Path,
    min_score: Option<u8>,
) -> anyhow::Result<usize> {
    let query = OpportunityQuery {
        min_score,
        ..OpportunityQuery::default()
    };
    let rows = query.apply(repo.get_all().await?);
    std::fs::write(path, export_json(&rows)?)?;
    println!("exported {} opportunities to {}", rows.len(), path.display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use oppfinder_core::{
        BuildComplexity, InMemoryOpportunityRepository, Theme, ValidationResult,
    };

    use super::*;

    fn opportunity(title: &str, mentions: i64, competitors: i64, revenue: i64) -> Opportunity {
        let theme = Theme {
            title: title.to_string(),
            problem: format!("People struggle with {}", title.to_lowercase()),
            mentions,
            build_complexity: BuildComplexity::Low,
            sources: vec!["r/SaaS".to_string()],
        };
        let validation = ValidationResult {
            has_paid_solutions: true,
            competitors,
            estimated_revenue: revenue,
            examples: vec!["Acme".to_string()],
            market_size: "Medium".to_string(),
        };
        Opportunity::assemble(
            &theme,
            &validation,
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    async fn seeded() -> InMemoryOpportunityRepository {
        let repo = InMemoryOpportunityRepository::new();
        // 25 + 35 + 15 + 20 = 95
        repo.save(&opportunity("Invoice Chaser", 80, 3, 12_000))
            .await
            .unwrap();
        // 10 + 25 + 15 + 20 = 70
        repo.save(&opportunity("Rota Planner", 20, 3, 6_000))
            .await
            .unwrap();
        repo
    }

    #[test]
    fn truncate_keeps_short_titles() {
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcde...");
    }

    #[test]
    fn table_has_header_and_one_row_per_opportunity() {
        let table = render_table(&[opportunity("Invoice Chaser", 80, 3, 12_000)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Invoice Chaser"));
        assert!(lines[1].contains("£12,000 MRR"));
        assert!(lines[1].contains("Build immediately"));
    }

    #[test]
    fn detail_lists_sources_and_example() {
        let detail = render_detail(&opportunity("Invoice Chaser", 80, 3, 12_000));
        assert!(detail.starts_with("#- Invoice Chaser"));
        assert!(detail.contains("Sources:        r/SaaS"));
        assert!(detail.contains("Example:        Acme"));
        assert!(detail.contains("Found:          2024-06-01 12:00 UTC"));
    }

    #[test]
    fn report_ranks_opportunities_in_given_order() {
        let top = [
            opportunity("Invoice Chaser", 80, 3, 12_000),
            opportunity("Rota Planner", 20, 3, 6_000),
        ];
        let report = render_report(&top, Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap());

        assert!(report.starts_with("# Opportunity Report\n"));
        assert!(report.contains("**Generated**: 2024-06-02 08:00 UTC"));
        assert!(report.contains("## 1. Invoice Chaser (95/100)"));
        assert!(report.contains("## 2. Rota Planner (70/100)"));
        assert!(report.contains("**Recommendation**: Validate with landing page first"));
    }

    #[test]
    fn stats_render_every_counter() {
        let rendered = render_stats(&OpportunityStats {
            total: 3,
            validated: 3,
            high_score: 1,
            avg_score: 71,
        });
        assert_eq!(
            rendered,
            "total:      3\nvalidated:  3\nhigh score: 1\navg score:  71\n"
        );
    }

    #[tokio::test]
    async fn export_writes_filtered_records() {
        let repo = seeded().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opportunities.json");

        let written = run_export(&repo, &path, Some(80)).await.unwrap();

        assert_eq!(written, 1);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "Invoice Chaser");
        assert_eq!(items[0]["id"], 1);
        assert_eq!(items[0]["score"], 95);
    }

    #[tokio::test]
    async fn show_unknown_id_is_an_error() {
        let repo = seeded().await;
        let err = run_show(&repo, 42).await.unwrap_err();
        assert!(err.to_string().contains("42"));
    }
}
