//! Per-node analysis state and the merge rules for streaming engine results.
//!
//! The engine delivers partial, out-of-order, variable-fidelity updates. The
//! merge is monotonic in visit counts: a stored per-move record is only
//! replaced by one with strictly more visits, so interim low-visit results
//! are superseded by deeper ones and displayed confidence never regresses,
//! regardless of arrival order.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::moves::Move;

/// Sort rank for moves the engine never ranked; sorts after every ranked move.
pub const ORDER_UNRANKED: u32 = 999;

/// Errors interpreting a raw engine payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed engine payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The engine's summary evaluation of a position (`rootInfo`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootSummary {
    /// Score margin; positive favors Black.
    pub score_lead: f64,
    /// Win probability for Black, in [0, 1].
    pub winrate: f64,
    pub visits: u32,
}

/// One per-move evaluation as it arrives from the engine (`moveInfos[i]`).
///
/// Optional fields may be absent from refinement updates; on a replace they
/// fall back to the stored record's values, mirroring a partial update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
    #[serde(rename = "move")]
    pub gtp: String,
    pub visits: u32,
    pub score_lead: f64,
    #[serde(default)]
    pub winrate: Option<f64>,
    #[serde(default)]
    pub order: Option<u32>,
    /// Principal variation: expected continuation, as GTP texts.
    #[serde(default)]
    pub pv: Option<Vec<String>>,
}

/// The stored per-move evaluation record.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRecord {
    pub gtp: String,
    pub visits: u32,
    pub score_lead: f64,
    pub winrate: Option<f64>,
    pub order: u32,
    pub pv: Option<Vec<String>>,
}

/// A structured engine result, tagged by the shape of the request that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineResult {
    /// Full position analysis: candidate evaluations plus summary snapshots.
    Full {
        move_infos: Vec<MoveInfo>,
        root_info: RootSummary,
        /// Per-intersection signed territory estimate.
        ownership: Option<Vec<f32>>,
        /// Per-intersection move prior plus one trailing pass entry.
        policy: Option<Vec<f32>>,
    },
    /// Refinement of a single candidate move: the root summary reinterpreted
    /// as that move's own evaluation.
    Refined {
        target: Move,
        root_info: RootSummary,
        /// Continuation after the target move (the target itself excluded).
        pv_tail: Vec<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullPayload {
    #[serde(default)]
    move_infos: Vec<MoveInfo>,
    root_info: RootSummary,
    #[serde(default)]
    ownership: Option<Vec<f32>>,
    #[serde(default)]
    policy: Option<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefinedPayload {
    root_info: RootSummary,
    #[serde(default)]
    move_infos: Vec<RefinedPvEntry>,
}

#[derive(Debug, Deserialize)]
struct RefinedPvEntry {
    #[serde(default)]
    pv: Vec<String>,
}

impl EngineResult {
    /// Interpret a raw engine JSON payload according to the request shape.
    ///
    /// A payload without a well-formed `rootInfo` is rejected as a whole;
    /// callers keep the node's prior state untouched.
    pub fn from_json(
        payload: serde_json::Value,
        refine_target: Option<Move>,
    ) -> Result<Self, PayloadError> {
        match refine_target {
            Some(target) => {
                let parsed: RefinedPayload = serde_json::from_value(payload)?;
                let pv_tail = parsed
                    .move_infos
                    .into_iter()
                    .next()
                    .map(|entry| entry.pv)
                    .unwrap_or_default();
                Ok(EngineResult::Refined {
                    target,
                    root_info: parsed.root_info,
                    pv_tail,
                })
            }
            None => {
                let parsed: FullPayload = serde_json::from_value(payload)?;
                Ok(EngineResult::Full {
                    move_infos: parsed.move_infos,
                    root_info: parsed.root_info,
                    ownership: parsed.ownership,
                    policy: parsed.policy,
                })
            }
        }
    }
}

/// Per-node analysis container: root summary, per-move records, ownership
/// map and policy distribution. Owned exclusively by its node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisState {
    /// None until the first full result merges ("analysis not ready").
    /// Once set, only ever replaced wholesale by a later full result.
    pub root: Option<RootSummary>,
    /// Per-move records keyed by GTP text. BTreeMap keeps iteration
    /// deterministic for stable regenerated output.
    pub moves: BTreeMap<String, MoveRecord>,
    pub ownership: Option<Vec<f32>>,
    pub policy: Option<Vec<f32>>,
}

impl AnalysisState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one engine result into this state.
    ///
    /// Full results replace `root`/`ownership`/`policy` wholesale (summary
    /// snapshots, not increments) and merge every move record under the
    /// monotonic-visits rule. Refinements merge exactly one record, keyed by
    /// the target's GTP text, and leave the summaries untouched.
    pub fn apply(&mut self, result: EngineResult) {
        match result {
            EngineResult::Full {
                move_infos,
                root_info,
                ownership,
                policy,
            } => {
                for info in move_infos {
                    self.update_move(info);
                }
                self.ownership = ownership;
                self.policy = policy;
                self.root = Some(root_info);
            }
            EngineResult::Refined {
                target,
                root_info,
                pv_tail,
            } => {
                let gtp = target.gtp();
                let mut pv = Vec::with_capacity(1 + pv_tail.len());
                pv.push(gtp.clone());
                pv.extend(pv_tail);
                self.update_move(MoveInfo {
                    gtp,
                    visits: root_info.visits,
                    score_lead: root_info.score_lead,
                    winrate: Some(root_info.winrate),
                    order: None,
                    pv: Some(pv),
                });
            }
        }
    }

    /// Monotonic-visits replace: insert when absent, replace only when the
    /// incoming visit count is strictly greater. Records are replaced
    /// wholesale, never field-patched in place; absent optional fields
    /// inherit the stored record's values.
    fn update_move(&mut self, info: MoveInfo) {
        match self.moves.get(&info.gtp) {
            None => {
                let record = MoveRecord {
                    visits: info.visits,
                    score_lead: info.score_lead,
                    winrate: info.winrate,
                    order: info.order.unwrap_or(ORDER_UNRANKED),
                    pv: info.pv,
                    gtp: info.gtp,
                };
                self.moves.insert(record.gtp.clone(), record);
            }
            Some(cur) if info.visits > cur.visits => {
                let record = MoveRecord {
                    visits: info.visits,
                    score_lead: info.score_lead,
                    winrate: info.winrate.or(cur.winrate),
                    order: info.order.unwrap_or(cur.order),
                    pv: info.pv.or_else(|| cur.pv.clone()),
                    gtp: info.gtp,
                };
                self.moves.insert(record.gtp.clone(), record);
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Player;
    use serde_json::json;

    fn full(move_infos: Vec<MoveInfo>, score: f64, winrate: f64, visits: u32) -> EngineResult {
        EngineResult::Full {
            move_infos,
            root_info: RootSummary {
                score_lead: score,
                winrate,
                visits,
            },
            ownership: None,
            policy: None,
        }
    }

    fn info(gtp: &str, visits: u32, score_lead: f64, order: u32) -> MoveInfo {
        MoveInfo {
            gtp: gtp.to_string(),
            visits,
            score_lead,
            winrate: None,
            order: Some(order),
            pv: None,
        }
    }

    #[test]
    fn test_full_merge_sets_root_and_moves() {
        let mut state = AnalysisState::new();
        assert!(state.root.is_none());

        state.apply(full(vec![info("D4", 10, 2.5, 0)], 2.5, 0.55, 10));

        let root = state.root.as_ref().unwrap();
        assert!((root.score_lead - 2.5).abs() < 1e-9);
        assert!((root.winrate - 0.55).abs() < 1e-9);
        assert_eq!(state.moves["D4"].visits, 10);
        assert_eq!(state.moves["D4"].order, 0);
    }

    #[test]
    fn test_monotonic_merge_order_independent() {
        let low = info("D4", 10, 1.0, 1);
        let high = info("D4", 50, 3.0, 0);

        let mut a = AnalysisState::new();
        a.apply(full(vec![low.clone()], 1.0, 0.5, 10));
        a.apply(full(vec![high.clone()], 3.0, 0.6, 50));

        let mut b = AnalysisState::new();
        b.apply(full(vec![high], 3.0, 0.6, 50));
        b.apply(full(vec![low], 1.0, 0.5, 10));

        // The 50-visit record wins in both arrival orders.
        assert_eq!(a.moves["D4"], b.moves["D4"]);
        assert_eq!(a.moves["D4"].visits, 50);
        assert!((a.moves["D4"].score_lead - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_visits_is_noop() {
        let mut state = AnalysisState::new();
        state.apply(full(vec![info("D4", 10, 1.0, 0)], 1.0, 0.5, 10));
        state.apply(full(vec![info("D4", 10, 9.0, 5)], 1.0, 0.5, 10));

        assert!((state.moves["D4"].score_lead - 1.0).abs() < 1e-9);
        assert_eq!(state.moves["D4"].order, 0);
    }

    #[test]
    fn test_unranked_insert_sorts_last() {
        let mut state = AnalysisState::new();
        let mut unranked = info("Q16", 5, 0.5, 0);
        unranked.order = None;
        state.apply(full(vec![unranked], 0.5, 0.5, 5));

        assert_eq!(state.moves["Q16"].order, ORDER_UNRANKED);
    }

    #[test]
    fn test_refinement_prefixes_pv_and_keeps_summaries() {
        let mut state = AnalysisState::new();
        state.apply(EngineResult::Full {
            move_infos: vec![],
            root_info: RootSummary {
                score_lead: 0.0,
                winrate: 0.5,
                visits: 1,
            },
            ownership: Some(vec![0.1; 4]),
            policy: Some(vec![0.2; 5]),
        });

        let target = Move::from_gtp("Q16", Player::White).unwrap();
        state.apply(EngineResult::Refined {
            target,
            root_info: RootSummary {
                score_lead: -1.5,
                winrate: 0.45,
                visits: 25,
            },
            pv_tail: vec!["D4".into(), "C3".into()],
        });

        let record = &state.moves["Q16"];
        assert_eq!(record.visits, 25);
        assert!((record.score_lead + 1.5).abs() < 1e-9);
        assert_eq!(
            record.pv.as_deref().unwrap(),
            &["Q16".to_string(), "D4".to_string(), "C3".to_string()][..]
        );

        // A refinement never touches root, ownership or policy.
        assert_eq!(state.root.as_ref().unwrap().visits, 1);
        assert_eq!(state.ownership.as_ref().unwrap().len(), 4);
        assert_eq!(state.policy.as_ref().unwrap().len(), 5);
    }

    #[test]
    fn test_refinement_superseded_by_full() {
        let mut state = AnalysisState::new();
        let target = Move::from_gtp("Q16", Player::White).unwrap();
        state.apply(EngineResult::Refined {
            target,
            root_info: RootSummary {
                score_lead: -1.0,
                winrate: 0.45,
                visits: 5,
            },
            pv_tail: vec![],
        });
        assert_eq!(state.moves["Q16"].order, ORDER_UNRANKED);

        state.apply(full(vec![info("Q16", 50, -0.5, 2)], -0.5, 0.48, 60));

        let record = &state.moves["Q16"];
        assert_eq!(record.visits, 50);
        assert_eq!(record.order, 2);
        assert!((record.score_lead + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_refinement_replace_preserves_engine_rank() {
        let mut state = AnalysisState::new();
        state.apply(full(vec![info("Q16", 10, -0.5, 2)], -0.5, 0.48, 20));

        let target = Move::from_gtp("Q16", Player::White).unwrap();
        state.apply(EngineResult::Refined {
            target,
            root_info: RootSummary {
                score_lead: -0.8,
                winrate: 0.46,
                visits: 40,
            },
            pv_tail: vec![],
        });

        // The refinement carries no rank; the stored one survives.
        let record = &state.moves["Q16"];
        assert_eq!(record.visits, 40);
        assert_eq!(record.order, 2);
    }

    #[test]
    fn test_full_replaces_summaries_wholesale() {
        let mut state = AnalysisState::new();
        state.apply(EngineResult::Full {
            move_infos: vec![],
            root_info: RootSummary {
                score_lead: 1.0,
                winrate: 0.5,
                visits: 10,
            },
            ownership: Some(vec![0.5; 4]),
            policy: Some(vec![0.25; 5]),
        });

        // A later full result without ownership/policy clears both.
        state.apply(full(vec![], 2.0, 0.6, 20));
        assert!(state.ownership.is_none());
        assert!(state.policy.is_none());
        assert_eq!(state.root.as_ref().unwrap().visits, 20);
    }

    #[test]
    fn test_from_json_full() {
        let payload = json!({
            "moveInfos": [
                {"move": "D4", "visits": 10, "scoreLead": 2.5, "order": 0,
                 "winrate": 0.55, "pv": ["D4", "Q16"]}
            ],
            "rootInfo": {"scoreLead": 2.5, "winrate": 0.55, "visits": 10},
            "policy": [0.1, 0.2, 0.7]
        });

        let result = EngineResult::from_json(payload, None).unwrap();
        match result {
            EngineResult::Full {
                move_infos,
                root_info,
                ownership,
                policy,
            } => {
                assert_eq!(move_infos.len(), 1);
                assert_eq!(move_infos[0].gtp, "D4");
                assert_eq!(move_infos[0].order, Some(0));
                assert_eq!(root_info.visits, 10);
                assert!(ownership.is_none());
                assert_eq!(policy.unwrap().len(), 3);
            }
            other => panic!("expected full result, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_refined() {
        let payload = json!({
            "moveInfos": [{"move": "D4", "visits": 9, "scoreLead": 0.1, "pv": ["D4", "C3"]}],
            "rootInfo": {"scoreLead": -1.5, "winrate": 0.45, "visits": 25}
        });

        let target = Move::from_gtp("Q16", Player::White).unwrap();
        let result = EngineResult::from_json(payload, Some(target)).unwrap();
        match result {
            EngineResult::Refined {
                target,
                root_info,
                pv_tail,
            } => {
                assert_eq!(target.gtp(), "Q16");
                assert_eq!(root_info.visits, 25);
                assert_eq!(pv_tail, vec!["D4".to_string(), "C3".to_string()]);
            }
            other => panic!("expected refined result, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_missing_root_is_rejected() {
        let payload = json!({"moveInfos": []});
        assert!(matches!(
            EngineResult::from_json(payload.clone(), None),
            Err(PayloadError::Malformed(_))
        ));

        let target = Move::from_gtp("Q16", Player::White).unwrap();
        assert!(matches!(
            EngineResult::from_json(payload, Some(target)),
            Err(PayloadError::Malformed(_))
        ));
    }
}
