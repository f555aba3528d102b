// Trade matching: complementary partners and per-player trade candidates.
//
// A partner is only worth approaching when both sides gain: it must be strong
// where we are weak (it can supply what we lack) and weak where we are strong
// (we can supply what it lacks). Within an eligible partner, each of its
// players is scored by what it adds to our need categories, and paired with
// players we could give up from our offer categories.
//
// Every trade is judged on its projected effect on our totals. Category
// changes are signed so that improvement is positive (a lower GA is an
// improvement) and scaled by the league baseline, so that 10 goals and 10 hits
// are not counted as the same thing. A trade is kept only when the gain in
// our need categories beats the loss in our strong ones by `min_net_gain`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::baseline::LeagueBaseline;
use crate::category::{Category, CategorySet};
use crate::classify::{classify_value, CategoryProfile, Classification, Thresholds, BASELINE_EPSILON};
use crate::stats::{combine_player_lines, PlayerStatLine, TeamTotals};
use crate::{PlayerId, TeamId};

/// Most players the requesting team gives up in one trade by default.
pub const DEFAULT_MAX_GIVE: usize = 2;

/// Default number of our own players considered as trade bait per partner.
pub const DEFAULT_GIVE_POOL_SIZE: usize = 6;

/// Default margin by which a trade must come out ahead, in units of one
/// league-average category total.
pub const DEFAULT_MIN_NET_GAIN: f64 = 0.05;

// ---------------------------------------------------------------------------
// Configuration and inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// 1 = only 1-for-1 trades, 2 = also 2-for-1 trades.
    pub max_give: usize,
    /// Cap on our own players offered to a single partner.
    pub give_pool_size: usize,
    /// A trade of any shape is kept only if `gain - cost` exceeds this.
    pub min_net_gain: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            max_give: DEFAULT_MAX_GIVE,
            give_pool_size: DEFAULT_GIVE_POOL_SIZE,
            min_net_gain: DEFAULT_MIN_NET_GAIN,
        }
    }
}

/// Everything the matcher reads for one requesting team. All borrowed and
/// read-only.
#[derive(Debug, Clone, Copy)]
pub struct MatchRequest<'a> {
    pub my_team: &'a str,
    pub my_profile: &'a CategoryProfile,
    pub all_profiles: &'a BTreeMap<TeamId, CategoryProfile>,
    pub player_stats: &'a [PlayerStatLine],
    pub my_totals: &'a TeamTotals,
    pub baseline: &'a LeagueBaseline,
    pub categories: &'a CategorySet,
    pub thresholds: &'a Thresholds,
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// A player on one side of a proposed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlayer {
    pub player_id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Received players: boost over the need categories.
    /// Given players: signed contribution to our strong categories.
    pub contribution: f64,
}

/// A proposed exchange with one partner team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeCandidate {
    pub partner: TeamId,
    pub give: Vec<TradePlayer>,
    pub receive: Vec<TradePlayer>,
    /// Need categories whose total moves the right way after the trade.
    pub improves: Vec<String>,
    /// Weak categories that would no longer be weak after the trade.
    pub resolves: Vec<String>,
    /// Strong categories that would no longer be strong after the trade.
    pub weakens: Vec<String>,
    /// Received player's signed values summed over the need categories.
    pub boost_score: f64,
    /// Projected improvement across the need categories, baseline-scaled.
    pub gain: f64,
    /// Projected loss across our strong categories, baseline-scaled.
    pub cost: f64,
    pub net_gain: f64,
}

impl TradeCandidate {
    /// "1-for-1", "2-for-1", ...
    pub fn shape(&self) -> String {
        format!("{}-for-{}", self.give.len(), self.receive.len())
    }
}

/// Candidate ordering: boost score descending, then fewest players given,
/// then received and given player ids ascending, then partner id.
pub fn compare_candidates(a: &TradeCandidate, b: &TradeCandidate) -> Ordering {
    b.boost_score
        .total_cmp(&a.boost_score)
        .then_with(|| a.give.len().cmp(&b.give.len()))
        .then_with(|| player_ids(&a.receive).cmp(&player_ids(&b.receive)))
        .then_with(|| player_ids(&a.give).cmp(&player_ids(&b.give)))
        .then_with(|| a.partner.cmp(&b.partner))
}

fn player_ids(players: &[TradePlayer]) -> Vec<&str> {
    players.iter().map(|p| p.player_id.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Partner eligibility
// ---------------------------------------------------------------------------

/// Categories that make a partner worth approaching.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerFit {
    pub partner: TeamId,
    /// We are weak, the partner is strong.
    pub need: Vec<String>,
    /// We are strong, the partner is weak.
    pub offer: Vec<String>,
}

/// Work out the complementary categories between us and a partner.
///
/// Returns `None` unless the match is two-sided.
pub fn partner_fit(
    my_profile: &CategoryProfile,
    partner: &CategoryProfile,
    categories: &CategorySet,
) -> Option<PartnerFit> {
    let mut need = Vec::new();
    let mut offer = Vec::new();
    for category in categories {
        let name = category.name.as_str();
        match (my_profile.get(name), partner.get(name)) {
            (Classification::Weak, Classification::Strong) => need.push(name.to_string()),
            (Classification::Strong, Classification::Weak) => offer.push(name.to_string()),
            _ => {}
        }
    }

    if need.is_empty() || offer.is_empty() {
        return None;
    }
    Some(PartnerFit {
        partner: partner.team_id.clone(),
        need,
        offer,
    })
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// A value signed so that larger is always better for the holder.
fn directed(category: Option<&Category>, value: f64) -> f64 {
    match category {
        Some(c) if !c.higher_is_better => -value,
        _ => value,
    }
}

/// Sum of a player's values over the given categories. Lower-is-better
/// categories count negatively, so a goalie allowing fewer goals scores
/// higher.
pub fn boost_score(line: &PlayerStatLine, names: &[String], categories: &CategorySet) -> f64 {
    names
        .iter()
        .map(|c| directed(categories.get(c), line.value(c)))
        .sum()
}

/// True if the player has a non-zero value in any of `names`.
fn contributes(line: &PlayerStatLine, names: &[String]) -> bool {
    names.iter().any(|c| line.value(c) != 0.0)
}

/// Find trade candidates for `request.my_team` across all eligible partners.
///
/// Output is sorted with [`compare_candidates`]. An empty list is a valid
/// outcome: no weak categories, no two-sided partners, no contributing
/// players, or no trade that comes out ahead.
pub fn find_candidates(request: &MatchRequest<'_>, config: &MatchConfig) -> Vec<TradeCandidate> {
    let my_strong: Vec<String> = request
        .my_profile
        .strong()
        .into_iter()
        .map(String::from)
        .collect();

    if request.my_profile.weak().is_empty() || my_strong.is_empty() {
        debug!(
            "team {} has nothing to trade for or nothing to trade from",
            request.my_team
        );
        return Vec::new();
    }

    let players = combine_player_lines(request.player_stats);
    let my_players: Vec<&PlayerStatLine> = players
        .iter()
        .filter(|p| p.team_id == request.my_team)
        .collect();

    let mut candidates = Vec::new();
    let mut partners = 0usize;
    let mut rejected = 0usize;

    for (team_id, profile) in request.all_profiles {
        if team_id == request.my_team {
            continue;
        }
        let Some(fit) = partner_fit(request.my_profile, profile, request.categories) else {
            continue;
        };
        partners += 1;

        let receivers: Vec<(&PlayerStatLine, f64)> = players
            .iter()
            .filter(|p| &p.team_id == team_id && contributes(p, &fit.need))
            .map(|p| (p, boost_score(p, &fit.need, request.categories)))
            .collect();

        let givers = give_pool(&my_players, &fit.offer, request.categories, config.give_pool_size);

        debug!(
            "partner {}: need {:?}, offer {:?}, {} receivers, {} givers",
            team_id,
            fit.need,
            fit.offer,
            receivers.len(),
            givers.len()
        );

        for (receiver, boost) in &receivers {
            for (i, giver) in givers.iter().enumerate() {
                let mut gives = vec![vec![*giver]];
                if config.max_give >= 2 {
                    gives.extend(givers[i + 1..].iter().map(|other| vec![*giver, *other]));
                }

                for give in gives {
                    let candidate =
                        build_candidate(request, &fit, &my_strong, &give, receiver, *boost);
                    if candidate.net_gain > config.min_net_gain {
                        candidates.push(candidate);
                    } else {
                        debug!(
                            "{} for {:?}: net gain {:.3} not above {}",
                            receiver.display_name(),
                            give.iter().map(|p| p.display_name()).collect::<Vec<_>>(),
                            candidate.net_gain,
                            config.min_net_gain
                        );
                        rejected += 1;
                    }
                }
            }
        }
    }

    candidates.sort_by(compare_candidates);
    info!(
        "team {}: {} eligible partners, {} trade candidates ({} below net gain margin)",
        request.my_team,
        partners,
        candidates.len(),
        rejected
    );
    candidates
}

/// Our players who have something in the partner's weak categories, best
/// first, capped at `size`.
fn give_pool<'a>(
    my_players: &[&'a PlayerStatLine],
    offer: &[String],
    categories: &CategorySet,
    size: usize,
) -> Vec<&'a PlayerStatLine> {
    let mut pool: Vec<(&PlayerStatLine, f64)> = my_players
        .iter()
        .filter(|p| contributes(p, offer))
        .map(|p| (*p, boost_score(p, offer, categories)))
        .collect();
    pool.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| a.0.player_id.cmp(&b.0.player_id))
    });
    pool.truncate(size);
    pool.into_iter().map(|(p, _)| p).collect()
}

/// Projected change to our total in `name`, signed so that improvement is
/// positive and divided by the league baseline. Categories with a zero
/// baseline count for nothing.
fn scaled_change(
    request: &MatchRequest<'_>,
    name: &str,
    give: &[&PlayerStatLine],
    receiver: &PlayerStatLine,
) -> f64 {
    let magnitude = request.baseline.value(name).abs();
    if magnitude < BASELINE_EPSILON {
        return 0.0;
    }
    let delta = receiver.value(name) - give.iter().map(|p| p.value(name)).sum::<f64>();
    directed(request.categories.get(name), delta) / magnitude
}

fn build_candidate(
    request: &MatchRequest<'_>,
    fit: &PartnerFit,
    my_strong: &[String],
    give: &[&PlayerStatLine],
    receiver: &PlayerStatLine,
    boost: f64,
) -> TradeCandidate {
    let give_players: Vec<TradePlayer> = give
        .iter()
        .map(|p| TradePlayer {
            player_id: p.player_id.clone(),
            name: p.name.clone(),
            contribution: boost_score(p, my_strong, request.categories),
        })
        .collect();

    let mut improves = Vec::new();
    let mut gain = 0.0;
    for name in &fit.need {
        let change = scaled_change(request, name, give, receiver);
        if change > 0.0 {
            improves.push(name.clone());
        }
        gain += change;
    }
    let cost: f64 = my_strong
        .iter()
        .map(|name| -scaled_change(request, name, give, receiver))
        .sum();

    let (resolves, weakens) = projected_changes(request, give, receiver);

    TradeCandidate {
        partner: fit.partner.clone(),
        give: give_players,
        receive: vec![TradePlayer {
            player_id: receiver.player_id.clone(),
            name: receiver.name.clone(),
            contribution: boost,
        }],
        improves,
        resolves,
        weakens,
        boost_score: boost,
        gain,
        cost,
        net_gain: gain - cost,
    }
}

/// Re-classify our totals as if the trade went through and report which weak
/// categories recover and which strong ones slip.
fn projected_changes(
    request: &MatchRequest<'_>,
    give: &[&PlayerStatLine],
    receiver: &PlayerStatLine,
) -> (Vec<String>, Vec<String>) {
    let mut resolves = Vec::new();
    let mut weakens = Vec::new();

    for category in request.categories {
        let name = category.name.as_str();
        let before = request.my_profile.get(name);
        if before == Classification::Neutral {
            continue;
        }
        let projected = request.my_totals.value(name)
            - give.iter().map(|p| p.value(name)).sum::<f64>()
            + receiver.value(name);
        let after = classify_value(
            category,
            projected,
            request.baseline.value(name),
            request.thresholds,
        );
        match (before, after) {
            (Classification::Weak, Classification::Neutral | Classification::Strong) => {
                resolves.push(name.to_string())
            }
            (Classification::Strong, Classification::Neutral | Classification::Weak) => {
                weakens.push(name.to_string())
            }
            _ => {}
        }
    }

    (resolves, weakens)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::{compute_baseline, BaselineMethod};
    use crate::category::Category;
    use crate::classify::classify;
    use crate::stats::aggregate;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn categories() -> CategorySet {
        CategorySet::new(vec![
            Category::higher("G"),
            Category::higher("HIT"),
            Category::higher("BLK"),
        ])
    }

    /// League baselines for [`league_lines`].
    const G_BASELINE: f64 = 77.0 / 3.0;
    const HIT_BASELINE: f64 = 92.0 / 3.0;

    /// Three-team league:
    /// - `me`: plenty of hits, few goals. `me-4` carries most of the hits.
    /// - `sniper`: plenty of goals, few hits. The natural partner.
    /// - `mirror`: strong in hits like us, weak in goals like us.
    ///
    /// Blocks are level across the league so they stay neutral.
    fn league_lines() -> Vec<PlayerStatLine> {
        vec![
            PlayerStatLine::new("me-1", "me").with_value("G", 4.0).with_value("HIT", 4.0).with_value("BLK", 90.0),
            PlayerStatLine::new("me-2", "me").with_value("G", 6.0).with_value("HIT", 2.0),
            PlayerStatLine::new("me-3", "me").with_value("G", 5.0),
            PlayerStatLine::new("me-4", "me").with_value("HIT", 40.0),
            PlayerStatLine::new("sn-1", "sniper").with_value("G", 30.0).with_value("HIT", 1.0).with_value("BLK", 90.0),
            PlayerStatLine::new("sn-2", "sniper").with_value("G", 20.0).with_value("HIT", 1.0),
            PlayerStatLine::new("sn-3", "sniper").with_missing("G"),
            PlayerStatLine::new("mi-1", "mirror").with_value("G", 8.0).with_value("HIT", 30.0).with_value("BLK", 90.0),
            PlayerStatLine::new("mi-2", "mirror").with_value("G", 4.0).with_value("HIT", 14.0),
        ]
    }

    struct Fixture {
        categories: CategorySet,
        lines: Vec<PlayerStatLine>,
        totals: BTreeMap<TeamId, TeamTotals>,
        baseline: LeagueBaseline,
        profiles: BTreeMap<TeamId, CategoryProfile>,
        thresholds: Thresholds,
    }

    impl Fixture {
        fn new(lines: Vec<PlayerStatLine>) -> Self {
            Fixture::with_categories(lines, categories())
        }

        fn with_categories(lines: Vec<PlayerStatLine>, categories: CategorySet) -> Self {
            let thresholds = Thresholds::default();
            let totals = aggregate(&lines, &categories).unwrap();
            let baseline = compute_baseline(&totals, &categories, BaselineMethod::Mean).unwrap();
            let profiles = totals
                .iter()
                .map(|(id, t)| (id.clone(), classify(t, &baseline, &categories, &thresholds)))
                .collect();
            Fixture {
                categories,
                lines,
                totals,
                baseline,
                profiles,
                thresholds,
            }
        }

        fn request<'a>(&'a self, team: &'a str) -> MatchRequest<'a> {
            MatchRequest {
                my_team: team,
                my_profile: &self.profiles[team],
                all_profiles: &self.profiles,
                player_stats: &self.lines,
                my_totals: &self.totals[team],
                baseline: &self.baseline,
                categories: &self.categories,
                thresholds: &self.thresholds,
            }
        }
    }

    fn ids(players: &[TradePlayer]) -> Vec<&str> {
        players.iter().map(|p| p.player_id.as_str()).collect()
    }

    #[test]
    fn only_two_sided_partner_is_matched() {
        let fx = Fixture::new(league_lines());
        assert_eq!(fx.profiles["me"].weak(), vec!["G"]);
        assert_eq!(fx.profiles["me"].strong(), vec!["HIT"]);

        let candidates = find_candidates(&fx.request("me"), &MatchConfig::default());
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.partner == "sniper"));
    }

    #[test]
    fn partner_fit_requires_both_sides() {
        let fx = Fixture::new(league_lines());
        let me = &fx.profiles["me"];
        assert!(partner_fit(me, &fx.profiles["mirror"], &fx.categories).is_none());

        let fit = partner_fit(me, &fx.profiles["sniper"], &fx.categories).unwrap();
        assert_eq!(fit.need, vec!["G"]);
        assert_eq!(fit.offer, vec!["HIT"]);
    }

    #[test]
    fn same_strengths_yield_no_candidates() {
        // Both teams strong in G and weak in HIT: nothing complementary.
        let lines = vec![
            PlayerStatLine::new("a-1", "a").with_value("G", 40.0).with_value("HIT", 10.0),
            PlayerStatLine::new("b-1", "b").with_value("G", 40.0).with_value("HIT", 10.0),
            PlayerStatLine::new("c-1", "c").with_value("G", 10.0).with_value("HIT", 100.0),
        ];
        let fx = Fixture::new(lines);
        let candidates = find_candidates(&fx.request("a"), &MatchConfig::default());
        assert!(candidates.iter().all(|c| c.partner != "b"));
    }

    #[test]
    fn zero_boost_players_are_excluded() {
        let fx = Fixture::new(league_lines());
        let candidates = find_candidates(&fx.request("me"), &MatchConfig::default());
        // sn-3 has no goals recorded.
        assert!(candidates
            .iter()
            .all(|c| c.receive.iter().all(|p| p.player_id != "sn-3")));
    }

    #[test]
    fn boost_is_sum_over_need_categories() {
        let fx = Fixture::new(league_lines());
        let candidates = find_candidates(&fx.request("me"), &MatchConfig::default());
        let best = &candidates[0];
        assert_eq!(best.receive[0].player_id, "sn-1");
        assert!(approx_eq(best.boost_score, 30.0, 1e-9));
        assert_eq!(best.improves, vec!["G"]);
    }

    #[test]
    fn boost_counts_lower_is_better_against_the_player() {
        let categories = CategorySet::new(vec![Category::higher("W"), Category::lower("GA")]);
        let goalie = PlayerStatLine::new("g", "t").with_value("W", 20.0).with_value("GA", 50.0);
        let names = vec!["W".to_string(), "GA".to_string()];
        assert!(approx_eq(boost_score(&goalie, &names, &categories), -30.0, 1e-9));
    }

    #[test]
    fn one_for_one_ranks_before_two_for_one_at_equal_boost() {
        let fx = Fixture::new(league_lines());
        let candidates = find_candidates(&fx.request("me"), &MatchConfig::default());

        let for_sn1: Vec<&TradeCandidate> = candidates
            .iter()
            .filter(|c| c.receive[0].player_id == "sn-1")
            .collect();
        let shapes: Vec<String> = for_sn1.iter().map(|c| c.shape()).collect();
        assert_eq!(shapes, vec!["1-for-1", "1-for-1", "2-for-1"]);
        assert_eq!(ids(&for_sn1[0].give), vec!["me-1"]);
        assert_eq!(ids(&for_sn1[1].give), vec!["me-2"]);
        assert_eq!(ids(&for_sn1[2].give), vec!["me-1", "me-2"]);
    }

    #[test]
    fn gain_and_cost_are_baseline_scaled() {
        let fx = Fixture::new(league_lines());
        let candidates = find_candidates(&fx.request("me"), &MatchConfig::default());

        // sn-1 for me-1 + me-2: goals 10 -> 30, hits 6 -> 1.
        let multi = candidates
            .iter()
            .find(|c| c.give.len() == 2 && c.receive[0].player_id == "sn-1")
            .unwrap();
        let gain = 20.0 / G_BASELINE;
        let cost = 5.0 / HIT_BASELINE;
        assert!(approx_eq(multi.gain, gain, 1e-9));
        assert!(approx_eq(multi.cost, cost, 1e-9));
        assert!(approx_eq(multi.net_gain, gain - cost, 1e-9));
        assert!(approx_eq(multi.give[0].contribution + multi.give[1].contribution, 6.0, 1e-9));
    }

    #[test]
    fn net_loss_trades_are_dropped_for_every_shape() {
        let fx = Fixture::new(league_lines());
        let candidates = find_candidates(&fx.request("me"), &MatchConfig::default());

        // me-4 holds 40 of our 46 hits; no amount of goals makes up for it.
        assert!(candidates
            .iter()
            .all(|c| c.give.iter().all(|p| p.player_id != "me-4")));
        assert!(candidates.iter().all(|c| c.net_gain > DEFAULT_MIN_NET_GAIN));
        assert_eq!(candidates.len(), 6);
    }

    #[test]
    fn margin_applies_to_one_for_one() {
        let fx = Fixture::new(league_lines());
        // sn-2 for me-2 nets 14/G - 1/HIT ~= 0.513, sn-2 for me-1 ~= 0.526.
        let config = MatchConfig {
            min_net_gain: 0.52,
            ..MatchConfig::default()
        };
        let candidates = find_candidates(&fx.request("me"), &config);

        let for_sn2: Vec<Vec<&str>> = candidates
            .iter()
            .filter(|c| c.receive[0].player_id == "sn-2")
            .map(|c| ids(&c.give))
            .collect();
        assert_eq!(for_sn2, vec![vec!["me-1"]]);
    }

    #[test]
    fn max_give_one_disables_multi_player_gives() {
        let fx = Fixture::new(league_lines());
        let config = MatchConfig {
            max_give: 1,
            ..MatchConfig::default()
        };
        let candidates = find_candidates(&fx.request("me"), &config);
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|c| c.shape() == "1-for-1"));
    }

    #[test]
    fn give_pool_only_offers_contributors() {
        let fx = Fixture::new(league_lines());
        let config = MatchConfig {
            min_net_gain: f64::NEG_INFINITY,
            ..MatchConfig::default()
        };
        let candidates = find_candidates(&fx.request("me"), &config);
        // me-3 has no hits, so it is never offered for a hits-hungry partner.
        assert!(candidates
            .iter()
            .all(|c| c.give.iter().all(|p| p.player_id != "me-3")));
    }

    #[test]
    fn projected_changes_are_reported() {
        let fx = Fixture::new(league_lines());
        let candidates = find_candidates(&fx.request("me"), &MatchConfig::default());
        let trade = candidates
            .iter()
            .find(|c| c.receive[0].player_id == "sn-1" && ids(&c.give) == vec!["me-1"])
            .unwrap();
        // 15 - 4 + 30 = 41 goals lifts us out of the weak band; 43 hits stays strong.
        assert_eq!(trade.resolves, vec!["G"]);
        assert!(trade.weakens.is_empty());
        assert!(approx_eq(trade.cost, 3.0 / HIT_BASELINE, 1e-9));
    }

    #[test]
    fn lost_strengths_are_reported() {
        let fx = Fixture::new(league_lines());
        let config = MatchConfig {
            min_net_gain: f64::NEG_INFINITY,
            ..MatchConfig::default()
        };
        let candidates = find_candidates(&fx.request("me"), &config);
        let trade = candidates
            .iter()
            .find(|c| c.receive[0].player_id == "sn-1" && ids(&c.give) == vec!["me-4"])
            .unwrap();
        // 46 - 40 + 1 = 7 hits.
        assert_eq!(trade.weakens, vec!["HIT"]);
        assert!(trade.net_gain < 0.0);
    }

    /// `me` allows too many goals and hits a lot; `good` has two stingy
    /// goalies and no hitting.
    fn goalie_lines() -> Vec<PlayerStatLine> {
        vec![
            PlayerStatLine::new("me-s", "me").with_value("HIT", 100.0),
            PlayerStatLine::new("me-g", "me").with_value("GA", 100.0).with_value("HIT", 5.0),
            PlayerStatLine::new("good-g1", "good").with_value("GA", 10.0),
            PlayerStatLine::new("good-g2", "good").with_value("GA", 30.0),
            PlayerStatLine::new("good-s", "good").with_value("HIT", 1.0),
            PlayerStatLine::new("mid-g", "mid").with_value("GA", 65.0),
            PlayerStatLine::new("mid-s", "mid").with_value("HIT", 50.0),
        ]
    }

    #[test]
    fn lower_is_better_need_prefers_the_stingier_goalie() {
        let categories = CategorySet::new(vec![Category::higher("HIT"), Category::lower("GA")]);
        let fx = Fixture::with_categories(goalie_lines(), categories);
        assert_eq!(fx.profiles["me"].weak(), vec!["GA"]);
        assert_eq!(fx.profiles["me"].strong(), vec!["HIT"]);
        assert!(fx.profiles["good"].is_strong("GA"));

        let candidates = find_candidates(&fx.request("me"), &MatchConfig::default());
        let receive: Vec<&str> = candidates.iter().map(|c| c.receive[0].player_id.as_str()).collect();
        assert_eq!(receive, vec!["good-g1", "good-g2"]);

        // Only swapping our goalie lowers GA; taking on a goalie for a
        // skater would raise it.
        assert!(candidates.iter().all(|c| ids(&c.give) == vec!["me-g"]));

        let best = &candidates[0];
        assert!(approx_eq(best.boost_score, -10.0, 1e-9));
        assert_eq!(best.improves, vec!["GA"]);
        assert_eq!(best.resolves, vec!["GA"]);
        assert!(best.weakens.is_empty());
    }

    #[test]
    fn output_is_deterministic() {
        let fx = Fixture::new(league_lines());
        let a = find_candidates(&fx.request("me"), &MatchConfig::default());
        let b = find_candidates(&fx.request("me"), &MatchConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn compare_breaks_ties_by_player_ids() {
        let player = |id: &str| TradePlayer {
            player_id: id.into(),
            name: None,
            contribution: 1.0,
        };
        let make = |give: &str, receive: &str| TradeCandidate {
            partner: "p".into(),
            give: vec![player(give)],
            receive: vec![player(receive)],
            improves: vec![],
            resolves: vec![],
            weakens: vec![],
            boost_score: 10.0,
            gain: 2.0,
            cost: 1.0,
            net_gain: 1.0,
        };
        let a = make("g1", "r1");
        let b = make("g2", "r1");
        let c = make("g1", "r2");
        assert_eq!(compare_candidates(&a, &b), Ordering::Less);
        assert_eq!(compare_candidates(&a, &c), Ordering::Less);
        assert_eq!(compare_candidates(&b, &c), Ordering::Less);
    }
}
