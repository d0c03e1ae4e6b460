use crate::config::EngineConfig;
use crate::feedback::FeedbackAction;
use crate::gesture::Axis;

use super::*;

fn card() -> CommitAnimator {
    CommitAnimator::new(AnimatorSettings::card(0, &EngineConfig::default()))
}

fn card_with_pass() -> CommitAnimator {
    let mut config = EngineConfig::default();
    config.gesture.axis = Axis::Both;
    CommitAnimator::new(AnimatorSettings::card(1, &config))
}

fn at(x: f32, y: f32, t_ms: u64) -> PointerSample {
    PointerSample::new(7, x, y, t_ms)
}

fn drag(animator: &mut CommitAnimator, dx: f32, dy: f32) {
    let _ = animator.begin(at(100.0, 100.0, 0));
    let _ = animator.update(at(100.0 + dx * 0.5, 100.0 + dy * 0.5, 40));
    let _ = animator.update(at(100.0 + dx, 100.0 + dy, 80));
}

#[test]
fn drag_past_threshold_commits_after_animation() {
    let mut animator = card();
    drag(&mut animator, 120.0, 0.0);
    assert_eq!(animator.offset(), Vector2::new(120.0, 0.0));

    let out = animator.release(at(220.0, 100.0, 90), ReleaseGate::default());
    let request = out.animation().expect("commit animation");
    assert_eq!(request.kind, AnimationKind::Commit);
    assert_eq!(request.vote, Some(Vote::Positive));
    assert_eq!(request.from, Vector2::new(120.0, 0.0));
    assert_eq!(request.to, Vector2::new(500.0, 0.0));
    assert_eq!(request.due_at_ms(), 290);
    assert!(out.contains(&AnimatorAction::Feedback(FeedbackAction::ShakeStop)));
    assert_eq!(animator.phase(), AnimatorPhase::Committing);
    assert!(!animator.is_interactive());

    assert!(animator.tick(289).resolved().is_none());
    let done = animator.tick(290);
    assert_eq!(done.resolved(), Some(Vote::Positive));
    assert_eq!(animator.phase(), AnimatorPhase::Idle);
    assert_eq!(animator.offset(), Vector2::ZERO);
    assert_eq!(animator.trace().commits, 1);
    assert_eq!(animator.trace().last_vote, Some(Vote::Positive));
}

#[test]
fn short_drag_returns_to_origin() {
    let mut animator = card();
    drag(&mut animator, -40.0, 0.0);
    let out = animator.release(at(60.0, 100.0, 90), ReleaseGate::default());
    let request = out.animation().expect("return animation");
    assert_eq!(request.kind, AnimationKind::Return);
    assert_eq!(request.vote, None);
    assert_eq!(request.to, Vector2::ZERO);
    assert_eq!(animator.phase(), AnimatorPhase::Cancelling);

    let done = animator.animation_finished(request.ticket);
    assert!(done.contains(&AnimatorAction::Returned));
    assert!(done.resolved().is_none());
    assert_eq!(animator.phase(), AnimatorPhase::Idle);
}

#[test]
fn duplicate_completion_is_ignored() {
    let mut animator = card();
    drag(&mut animator, -130.0, 0.0);
    let request = animator
        .release(at(-30.0, 100.0, 90), ReleaseGate::default())
        .animation()
        .expect("commit animation");

    assert_eq!(
        animator.animation_finished(request.ticket).resolved(),
        Some(Vote::Negative)
    );
    assert!(animator.animation_finished(request.ticket).is_empty());
    assert!(animator.tick(10_000).is_empty());
    assert_eq!(animator.trace().commits, 1);
    assert_eq!(animator.trace().stale_completions, 1);
}

#[test]
fn ticket_from_earlier_animation_does_not_finish_current_one() {
    let mut animator = card();
    drag(&mut animator, 20.0, 0.0);
    let first = animator
        .release(at(120.0, 100.0, 90), ReleaseGate::default())
        .animation()
        .expect("return animation");
    let _ = animator.animation_finished(first.ticket);

    let _ = animator.begin(at(100.0, 100.0, 500));
    let _ = animator.update(at(200.0, 100.0, 540));
    let second = animator
        .release(at(200.0, 100.0, 560), ReleaseGate::default())
        .animation()
        .expect("commit animation");
    assert_ne!(first.ticket, second.ticket);

    assert!(animator.animation_finished(first.ticket).is_empty());
    assert_eq!(animator.phase(), AnimatorPhase::Committing);
    assert_eq!(
        animator.animation_finished(second.ticket).resolved(),
        Some(Vote::Positive)
    );
}

#[test]
fn tap_resolves_without_animation() {
    let mut animator = card();
    let _ = animator.begin(at(100.0, 100.0, 0));
    let out = animator.release(at(100.0, 100.0, 60), ReleaseGate::default());
    assert!(out.contains(&AnimatorAction::Tapped));
    assert!(out.animation().is_none());
    assert_eq!(animator.phase(), AnimatorPhase::Idle);
    assert_eq!(animator.trace().taps, 1);
}

#[test]
fn begin_is_refused_while_animating() {
    let mut animator = card();
    drag(&mut animator, 150.0, 0.0);
    let _ = animator.release(at(250.0, 100.0, 90), ReleaseGate::default());

    let out = animator.begin(at(100.0, 100.0, 100));
    assert!(out.contains(&AnimatorAction::Refused));
    assert_eq!(animator.phase(), AnimatorPhase::Committing);
    assert_eq!(animator.trace().refused_begins, 1);
}

#[test]
fn second_pointer_is_ignored_during_drag() {
    let mut animator = card();
    let _ = animator.begin(at(100.0, 100.0, 0));
    assert!(animator
        .begin(PointerSample::new(9, 10.0, 10.0, 5))
        .is_empty());
    assert!(animator
        .update(PointerSample::new(9, 400.0, 10.0, 10))
        .is_empty());
    assert!(animator
        .release(PointerSample::new(9, 400.0, 10.0, 20), ReleaseGate::default())
        .is_empty());
    assert_eq!(animator.phase(), AnimatorPhase::Dragging);
    assert_eq!(animator.offset(), Vector2::ZERO);
}

#[test]
fn upward_swipe_passes_when_allowed() {
    let mut animator = card_with_pass();
    drag(&mut animator, 10.0, -120.0);
    let request = animator
        .release(at(110.0, -20.0, 90), ReleaseGate::default())
        .animation()
        .expect("pass animation");
    assert_eq!(request.kind, AnimationKind::Commit);
    assert_eq!(request.to, Vector2::new(10.0, -500.0));
    assert_eq!(animator.tick(290).resolved(), Some(Vote::Pass));
}

#[test]
fn vetoed_pass_snaps_back() {
    let mut animator = card_with_pass();
    drag(&mut animator, 10.0, -120.0);
    let out = animator.release(at(110.0, -20.0, 90), ReleaseGate { allow_pass: false });
    assert!(out.contains(&AnimatorAction::Vetoed { vote: Vote::Pass }));
    let request = out.animation().expect("return animation");
    assert_eq!(request.kind, AnimationKind::Return);
    let done = animator.tick(240);
    assert!(done.contains(&AnimatorAction::Returned));
    assert_eq!(animator.trace().commits, 0);
}

#[test]
fn cancel_mid_drag_animates_back() {
    let mut animator = card();
    drag(&mut animator, 60.0, 0.0);
    let out = animator.cancel(100);
    let request = out.animation().expect("return animation");
    assert_eq!(request.kind, AnimationKind::Return);
    assert_eq!(request.from, Vector2::new(60.0, 0.0));
    assert!(animator.tick(250).contains(&AnimatorAction::Returned));
}

#[test]
fn cancel_before_motion_returns_immediately() {
    let mut animator = card();
    let _ = animator.begin(at(100.0, 100.0, 0));
    let out = animator.cancel(10);
    assert!(out.contains(&AnimatorAction::Returned));
    assert!(out.animation().is_none());
    assert_eq!(animator.phase(), AnimatorPhase::Idle);
}

#[test]
fn no_haptics_after_release() {
    let mut animator = card();
    drag(&mut animator, 140.0, 0.0);
    let _ = animator.release(at(240.0, 100.0, 90), ReleaseGate::default());
    for t_ms in (100..600).step_by(10) {
        let out = animator.tick(t_ms);
        assert!(out
            .iter()
            .all(|action| !matches!(action, AnimatorAction::Feedback(FeedbackAction::Haptic(_)))));
    }
}

#[test]
fn slider_confirms_and_stays_put() {
    let mut slider = CommitAnimator::new(AnimatorSettings::slider(&EngineConfig::default()));
    let _ = slider.begin(at(0.0, 0.0, 0));
    let _ = slider.update(at(150.0, 0.0, 50));
    let request = slider
        .release(at(150.0, 0.0, 60), ReleaseGate::default())
        .animation()
        .expect("confirm animation");
    assert_eq!(request.to, Vector2::new(200.0, 0.0));

    assert_eq!(slider.tick(260).resolved(), Some(Vote::Positive));
    assert_eq!(slider.phase(), AnimatorPhase::Confirmed);
    assert_eq!(slider.offset(), Vector2::new(200.0, 0.0));

    assert!(slider.begin(at(0.0, 0.0, 300)).contains(&AnimatorAction::Refused));
    assert_eq!(slider.phase(), AnimatorPhase::Confirmed);
}

#[test]
fn slider_below_commit_ratio_springs_back() {
    let mut slider = CommitAnimator::new(AnimatorSettings::slider(&EngineConfig::default()));
    let _ = slider.begin(at(0.0, 0.0, 0));
    let _ = slider.update(at(139.0, 0.0, 50));
    let request = slider
        .release(at(139.0, 0.0, 60), ReleaseGate::default())
        .animation()
        .expect("return animation");
    assert_eq!(request.kind, AnimationKind::Return);
    let _ = slider.animation_finished(request.ticket);
    assert_eq!(slider.phase(), AnimatorPhase::Idle);
    assert_eq!(slider.offset(), Vector2::ZERO);
}
