//! Town square views: offers, announcements, reactions, comments and trust
//! bonus lookups.

use super::context::{
    ActivityCommentsContext, AnnouncementsContext, CommentView, OfferActionContext,
    OfferContext, OffersContext, ReactionContext, TrustScoreContext,
};
use super::render::TemplateResponse;
use crate::domain::Network;
use crate::error::ViewResult;
use crate::models::{Activity, Comment, OfferActionKind, Profile};
use crate::repositories::{
    AccountRepository, ActivityRepository, AnnouncementRepository, OfferRepository, TipRepository,
    TownSquareStore, TrustScoreRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Told about every comment after it is saved.
#[async_trait]
pub trait CommentNotifier: Send + Sync {
    async fn comment_posted(&self, comment: &Comment, activity: &Activity, author: &Profile);
}

/// Notifier that only logs.
#[derive(Debug, Clone, Default)]
pub struct TracingCommentNotifier;

#[async_trait]
impl CommentNotifier for TracingCommentNotifier {
    async fn comment_posted(&self, comment: &Comment, activity: &Activity, author: &Profile) {
        tracing::info!(
            comment_id = comment.id,
            activity_id = activity.id,
            "{}",
            comment.describe(&author.handle)
        );
    }
}

/// Sum of `value_in_eth` over the given tip values.
pub fn tip_total(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().sum()
}

/// Handlers behind the town square.
#[derive(Clone)]
pub struct TownSquareViews {
    store: Arc<dyn TownSquareStore>,
    notifier: Arc<dyn CommentNotifier>,
    network: Network,
}

impl TownSquareViews {
    /// `network` selects which tips count towards comment totals.
    pub fn new(store: Arc<dyn TownSquareStore>, network: Network) -> Self {
        Self {
            store,
            notifier: Arc::new(TracingCommentNotifier),
            network,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn CommentNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub async fn current_offers(
        &self,
        now: DateTime<Utc>,
    ) -> ViewResult<TemplateResponse<OffersContext>> {
        let offers = self.store.current_offers(now).await?;
        Ok(TemplateResponse::new(
            "townsquare/offers.html",
            OffersContext {
                offers: offers.into_iter().map(Into::into).collect(),
            },
        ))
    }

    pub async fn current_announcements(
        &self,
        now: DateTime<Utc>,
    ) -> ViewResult<TemplateResponse<AnnouncementsContext>> {
        let announcements = self.store.current_announcements(now).await?;
        Ok(TemplateResponse::new(
            "townsquare/announcements.html",
            AnnouncementsContext { announcements },
        ))
    }

    /// Show one offer, counting the view.
    pub async fn view_offer(&self, offer_id: i64) -> ViewResult<TemplateResponse<OfferContext>> {
        let offer = self.store.increment_view_count(offer_id).await?;
        Ok(TemplateResponse::new(
            "townsquare/offer.html",
            OfferContext {
                offer: offer.into(),
            },
        ))
    }

    pub async fn record_offer_action(
        &self,
        profile_id: i64,
        offer_id: i64,
        what: OfferActionKind,
    ) -> ViewResult<TemplateResponse<OfferActionContext>> {
        let profile = self.store.get_profile(profile_id).await?;
        let offer = self.store.get_offer(offer_id).await?;
        let action = self
            .store
            .record_offer_action(profile.id, offer.id, what)
            .await?;

        let description = action.describe(&profile.handle, &offer.title);
        tracing::info!("{}", description);

        Ok(TemplateResponse::new(
            "townsquare/offer_action.html",
            OfferActionContext {
                action,
                description,
            },
        ))
    }

    /// Save a comment, then notify.
    pub async fn post_comment(
        &self,
        profile_id: i64,
        activity_id: i64,
        text: &str,
    ) -> ViewResult<TemplateResponse<CommentView>> {
        let author = self.store.get_profile(profile_id).await?;
        let activity = self.store.get_activity(activity_id).await?;
        let comment = self
            .store
            .create_comment(author.id, activity.id, text)
            .await?;

        self.notifier
            .comment_posted(&comment, &activity, &author)
            .await;

        let view = self.comment_view(comment, &activity, &author.handle).await?;
        Ok(TemplateResponse::new("townsquare/comment.html", view))
    }

    pub async fn activity_comments(
        &self,
        activity_id: i64,
    ) -> ViewResult<TemplateResponse<ActivityCommentsContext>> {
        let activity = self.store.get_activity(activity_id).await?;
        let comments = self.store.comments_for_activity(activity.id).await?;
        let likes = self.store.likes_for_activity(activity.id).await?.len();
        let flags = self.store.flags_for_activity(activity.id).await?.len();

        let mut handles: HashMap<i64, String> = HashMap::new();
        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let handle = match handles.get(&comment.profile_id) {
                Some(handle) => handle.clone(),
                None => {
                    let profile = self.store.get_profile(comment.profile_id).await?;
                    handles.insert(profile.id, profile.handle.clone());
                    profile.handle
                }
            };
            views.push(self.comment_view(comment, &activity, &handle).await?);
        }

        Ok(TemplateResponse::new(
            "townsquare/comments.html",
            ActivityCommentsContext {
                activity_id: activity.id,
                comments: views,
                likes,
                flags,
            },
        ))
    }

    pub async fn like_activity(
        &self,
        profile_id: i64,
        activity_id: i64,
    ) -> ViewResult<TemplateResponse<ReactionContext>> {
        let profile = self.store.get_profile(profile_id).await?;
        let activity = self.store.get_activity(activity_id).await?;
        let like = self.store.create_like(profile.id, activity.id).await?;

        Ok(TemplateResponse::new(
            "townsquare/reaction.html",
            ReactionContext {
                id: like.id,
                activity_id: activity.id,
                url: activity.url,
                description: like.describe(&profile.handle),
            },
        ))
    }

    pub async fn flag_activity(
        &self,
        profile_id: i64,
        activity_id: i64,
    ) -> ViewResult<TemplateResponse<ReactionContext>> {
        let profile = self.store.get_profile(profile_id).await?;
        let activity = self.store.get_activity(activity_id).await?;
        let flag = self.store.create_flag(profile.id, activity.id).await?;

        Ok(TemplateResponse::new(
            "townsquare/reaction.html",
            ReactionContext {
                id: flag.id,
                activity_id: activity.id,
                url: activity.url,
                description: flag.describe(&profile.handle),
            },
        ))
    }

    pub async fn trust_score(
        &self,
        user_id: i64,
    ) -> ViewResult<TemplateResponse<TrustScoreContext>> {
        let trust_score = self.store.trust_score_for_user(user_id).await?;
        Ok(TemplateResponse::new(
            "townsquare/trust_score.html",
            TrustScoreContext {
                user_id,
                trust_score,
            },
        ))
    }

    async fn comment_view(
        &self,
        comment: Comment,
        activity: &Activity,
        handle: &str,
    ) -> ViewResult<CommentView> {
        let tips = self
            .store
            .tips_for(&comment.tip_reference(), self.network)
            .await?;

        Ok(CommentView {
            display: comment.describe(handle),
            profile_handle: handle.to_string(),
            tip_able: activity.tip_able(),
            url: activity.url.clone(),
            tip_count_eth: tip_total(tips.iter().map(|t| t.value_in_eth)),
            comment,
        })
    }
}
