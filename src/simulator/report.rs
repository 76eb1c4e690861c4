//! Simulation report generation.

use super::runner::RunStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    pub generated_at: String,
    pub num_runs: u32,
    pub target_wave: u32,
    pub runs_completed: u32,

    // Aggregated stats
    pub avg_final_wave: f64,
    pub avg_gold_earned: f64,
    pub avg_hero_level: f64,
    pub avg_party_wipes: f64,
    pub avg_enemies_killed: f64,
    pub avg_bosses_killed: f64,

    // Loot
    pub avg_items_found: f64,
    pub avg_items_lost: f64,
    pub avg_legendary_items: f64,

    /// Runs ending on each wave
    pub wave_distribution: BTreeMap<u32, u32>,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, target_wave: u32) -> Self {
        let num_runs = runs.len() as u32;
        let divisor = num_runs.max(1) as f64;
        let average = |f: fn(&RunStats) -> f64| runs.iter().map(f).sum::<f64>() / divisor;

        let mut wave_distribution = BTreeMap::new();
        for run in &runs {
            *wave_distribution.entry(run.final_wave).or_insert(0) += 1;
        }

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            num_runs,
            target_wave,
            runs_completed: runs.iter().filter(|r| r.reached_target).count() as u32,
            avg_final_wave: average(|r| r.final_wave as f64),
            avg_gold_earned: average(|r| r.gold_earned as f64),
            avg_hero_level: average(|r| r.avg_hero_level),
            avg_party_wipes: average(|r| r.party_wipes as f64),
            avg_enemies_killed: average(|r| r.enemies_killed as f64),
            avg_bosses_killed: average(|r| r.bosses_killed as f64),
            avg_items_found: average(|r| r.items_found as f64),
            avg_items_lost: average(|r| r.items_lost as f64),
            avg_legendary_items: average(|r| r.legendary_items as f64),
            wave_distribution,
            run_stats: runs,
        }
    }

    pub fn completion_rate(&self) -> f64 {
        if self.num_runs == 0 {
            return 0.0;
        }
        self.runs_completed as f64 / self.num_runs as f64 * 100.0
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} reached wave {}\n\n",
            self.num_runs, self.runs_completed, self.target_wave
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Final Wave:      {:.1}\n",
            self.avg_final_wave
        ));
        report.push_str(&format!(
            "  Avg Hero Level:      {:.1}\n",
            self.avg_hero_level
        ));
        report.push_str(&format!(
            "  Avg Gold Earned:     {:.0}\n",
            self.avg_gold_earned
        ));
        report.push_str(&format!(
            "  Avg Enemies Killed:  {:.0}\n",
            self.avg_enemies_killed
        ));
        report.push_str(&format!(
            "  Avg Bosses Killed:   {:.1}\n",
            self.avg_bosses_killed
        ));
        report.push_str(&format!(
            "  Avg Party Wipes:     {:.1}\n\n",
            self.avg_party_wipes
        ));

        report.push_str("── LOOT ─────────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Items Found:     {:.1}\n",
            self.avg_items_found
        ));
        report.push_str(&format!(
            "  Avg Items Lost:      {:.1}\n",
            self.avg_items_lost
        ));
        report.push_str(&format!(
            "  Avg Legendaries:     {:.2}\n\n",
            self.avg_legendary_items
        ));

        report.push_str("── FINAL WAVE ───────────────────────────────────────────────────\n");
        for (wave, count) in &self.wave_distribution {
            let pct = *count as f64 / self.num_runs.max(1) as f64 * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Wave {:3}: {:>5.1}% {}\n", wave, pct, bar));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Completion Rate: {:.1}%\n",
            self.completion_rate()
        ));
        let wipe_rating = if self.avg_party_wipes < 1.0 {
            "TOO EASY - Party rarely wipes"
        } else if self.avg_party_wipes < 10.0 {
            "GOOD - Boss walls bite but clear"
        } else {
            "TOO HARD - Party stuck wiping"
        };
        report.push_str(&format!("  Wipe Rating:     {}\n", wipe_rating));
        if self.avg_items_lost > 0.0 {
            report.push_str("  ⚠️  Drops lost to a full inventory\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
