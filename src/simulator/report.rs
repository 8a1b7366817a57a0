//! Simulation report generation.

use super::config::SimConfig;
use super::runner::RunStats;
use crate::realm::Realm;
use serde::Serialize;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub runs_completed: u32,
    pub runs_timed_out: u32,
    pub target_realm: String,

    // Aggregated stats
    pub avg_final_realm_index: f64,
    pub avg_final_stage: f64,
    pub avg_final_foundation: f64,
    pub avg_sessions: f64,
    pub avg_encounters: f64,
    pub avg_choices: f64,
    pub avg_meditations: f64,
    pub avg_stones_earned: f64,
    pub avg_final_wealth: f64,
    pub breakthrough_success_ratio: f64,

    /// Runs ending in each realm, indexed by realm.
    pub realm_distribution: Vec<u32>,
    /// Average session at which each realm was entered, over runs that got there.
    pub avg_sessions_to_realm: Vec<Option<f64>>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn average(runs: &[RunStats], f: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(f).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, config: &SimConfig) -> Self {
        let num_runs = runs.len() as u32;
        let runs_completed = runs.iter().filter(|r| r.reached_target).count() as u32;
        let runs_timed_out = runs
            .iter()
            .filter(|r| !r.reached_target && r.sessions >= config.max_sessions)
            .count() as u32;

        let successes: u64 = runs.iter().map(|r| r.breakthroughs).sum();
        let failures: u64 = runs.iter().map(|r| r.breakthrough_failures).sum();
        let breakthrough_success_ratio = if successes + failures > 0 {
            successes as f64 / (successes + failures) as f64
        } else {
            0.0
        };

        let realm_count = Realm::all().len();
        let mut realm_distribution = vec![0; realm_count];
        for run in &runs {
            realm_distribution[run.final_realm.index()] += 1;
        }

        let avg_sessions_to_realm = (0..realm_count)
            .map(|i| {
                let reached: Vec<u64> = runs.iter().filter_map(|r| r.realm_entered_at[i]).collect();
                if reached.is_empty() {
                    None
                } else {
                    Some(reached.iter().sum::<u64>() as f64 / reached.len() as f64)
                }
            })
            .collect();

        Self {
            num_runs,
            runs_completed,
            runs_timed_out,
            target_realm: config.target_realm.name().to_string(),
            avg_final_realm_index: average(&runs, |r| r.final_realm.index() as f64),
            avg_final_stage: average(&runs, |r| r.final_stage as f64),
            avg_final_foundation: average(&runs, |r| r.final_foundation as f64),
            avg_sessions: average(&runs, |r| r.sessions as f64),
            avg_encounters: average(&runs, |r| r.encounters as f64),
            avg_choices: average(&runs, |r| r.choices as f64),
            avg_meditations: average(&runs, |r| r.meditations as f64),
            avg_stones_earned: average(&runs, |r| r.stones_earned as f64),
            avg_final_wealth: average(&runs, |r| r.final_wealth as f64),
            breakthrough_success_ratio,
            realm_distribution,
            avg_sessions_to_realm,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} reached {}, {} timed out\n\n",
            self.num_runs, self.runs_completed, self.target_realm, self.runs_timed_out
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        let avg_realm = Realm::all()[(self.avg_final_realm_index.round() as usize).min(Realm::all().len() - 1)];
        report.push_str(&format!(
            "  Avg Final Realm:     {:.2} (~{})\n",
            self.avg_final_realm_index, avg_realm
        ));
        report.push_str(&format!("  Avg Final Stage:     {:.1}\n", self.avg_final_stage));
        report.push_str(&format!("  Avg Foundation:      {:.1}\n", self.avg_final_foundation));
        report.push_str(&format!("  Avg Sessions:        {:.0}\n", self.avg_sessions));
        report.push_str(&format!(
            "  Breakthrough Rate:   {:.1}%\n\n",
            self.breakthrough_success_ratio * 100.0
        ));

        report.push_str("── ENCOUNTERS & ECONOMY ─────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Encounters:      {:.1}\n", self.avg_encounters));
        report.push_str(&format!("  Avg Choices Made:    {:.1}\n", self.avg_choices));
        report.push_str(&format!("  Avg Meditations:     {:.1}\n", self.avg_meditations));
        report.push_str(&format!("  Avg Stones Earned:   {:.1}\n", self.avg_stones_earned));
        report.push_str(&format!("  Avg Final Wealth:    {:.0}\n\n", self.avg_final_wealth));

        report.push_str("── REALM PACING ─────────────────────────────────────────────────\n");
        for realm in Realm::all() {
            let ended = self.realm_distribution[realm.index()];
            let pct = if self.num_runs > 0 {
                ended as f64 / self.num_runs as f64 * 100.0
            } else {
                0.0
            };
            let bar = "█".repeat((pct / 5.0) as usize);
            let pace = match self.avg_sessions_to_realm[realm.index()] {
                Some(sessions) => format!("{sessions:>8.0}"),
                None => "       -".to_string(),
            };
            report.push_str(&format!("  {:<20} {} {:>5.1}% {}\n", realm.name(), pace, pct, bar));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(realm: Realm, sessions: u64, breakthroughs: u64, failures: u64) -> RunStats {
        let mut realm_entered_at = vec![None; 10];
        for i in 0..=realm.index() {
            realm_entered_at[i] = Some(i as u64 * 100);
        }
        RunStats {
            final_realm: realm,
            final_stage: 5,
            final_foundation: 60,
            sessions,
            reached_target: realm >= Realm::FoundationBuilding,
            breakthroughs,
            breakthrough_failures: failures,
            encounters: 12,
            choices: 2,
            meditations: 1,
            stones_earned: 40,
            final_wealth: 700,
            final_location: crate::locations::best_unlocked(realm),
            realm_entered_at,
        }
    }

    #[test]
    fn test_report_generation() {
        let config = SimConfig {
            max_sessions: 500,
            target_realm: Realm::FoundationBuilding,
            ..Default::default()
        };
        let runs = vec![
            run(Realm::FoundationBuilding, 300, 2, 1),
            run(Realm::QiGathering, 500, 1, 3),
        ];

        let report = SimReport::from_runs(runs, &config);
        assert_eq!(report.num_runs, 2);
        assert_eq!(report.runs_completed, 1);
        assert_eq!(report.runs_timed_out, 1);
        assert!((report.avg_final_realm_index - 1.5).abs() < 1e-9);
        assert!((report.breakthrough_success_ratio - 3.0 / 7.0).abs() < 1e-9);
        assert_eq!(report.realm_distribution[1], 1);
        assert_eq!(report.realm_distribution[2], 1);
        assert_eq!(report.avg_sessions_to_realm[2], Some(200.0));
        assert_eq!(report.avg_sessions_to_realm[3], None);

        let text = report.to_text();
        assert!(text.contains("Foundation Building"));
        assert!(text.contains("Avg Choices Made:    2.0"));
        let json = report.to_json();
        assert!(json.contains("\"breakthrough_success_ratio\""));
        assert!(!json.contains("run_stats"));
    }

    #[test]
    fn test_empty_report() {
        let report = SimReport::from_runs(Vec::new(), &SimConfig::default());
        assert_eq!(report.avg_sessions, 0.0);
        assert!(report.to_text().contains("SIMULATION REPORT"));
    }
}
