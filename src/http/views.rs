//! JSON request and response bodies.

use crate::account::domain::{CitizenProfile, User, UserId};
use crate::chat::{
    domain::{ChatMessage, ChatMessageId, ChatRoom, RoomId},
    services::{RoomSummary, RoomView},
};
use crate::issue::{
    domain::{Issue, IssueId, IssueStatus, Leader, LeaderId},
    services::ResolutionOutcome,
};
use crate::notification::services::InboxSummary;
use crate::realtime::NotificationPayload;
use crate::social::domain::{Comment, CommentId, CommentThread, EngagementSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserBody {
    /// Login name.
    pub username: String,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Optional display name.
    #[serde(default)]
    pub real_name: Option<String>,
}

/// Body of `PUT /api/users/me/bio`.
#[derive(Debug, Clone, Deserialize)]
pub struct BioBody {
    /// New biography text.
    pub bio: String,
}

/// Body of `POST /api/leaders`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterLeaderBody {
    /// Leader's name.
    pub name: String,
    /// Office held.
    pub designation: String,
    /// Optional portrait URL.
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Account that acts for the leader.
    #[serde(default)]
    pub account_id: Option<UserId>,
}

/// Body of `POST /api/issues`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitIssueBody {
    /// Short title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Leader responsible for the issue.
    pub leader_id: LeaderId,
    /// Optional photo URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Body of comment and reply requests.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentBodyRequest {
    /// Comment text.
    pub content: String,
}

/// Body of `POST /api/chats`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomBody {
    /// Users to chat with, besides the actor.
    pub participants: Vec<UserId>,
    /// Whether the room is a group chat.
    #[serde(default)]
    pub is_group_chat: bool,
    /// Group name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /api/chats/{id}/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageBody {
    /// Message text.
    pub message: String,
    /// Optional attachment URL.
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Body of `POST /api/chats/{id}/members`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMembersBody {
    /// Users to add.
    pub members: Vec<UserId>,
}

/// A user and their citizen profile.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Display name.
    pub real_name: String,
    /// Biography.
    pub bio: String,
    /// Reputation points.
    pub reputation: u64,
    /// Number of followers.
    pub followers: usize,
    /// Number of followed users.
    pub following: usize,
    /// Registration timestamp.
    pub joined_at: DateTime<Utc>,
}

impl UserView {
    /// Combines a user with their profile.
    #[must_use]
    pub fn new(user: &User, profile: &CitizenProfile) -> Self {
        Self {
            id: user.id(),
            username: user.username().as_str().to_owned(),
            real_name: profile.real_name().to_owned(),
            bio: profile.bio().to_owned(),
            reputation: profile.reputation(),
            followers: profile.followers().len(),
            following: profile.following().len(),
            joined_at: user.joined_at(),
        }
    }
}

/// Result of a follow or unfollow.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FollowView {
    /// Whether the actor now follows the user.
    pub following: bool,
    /// Whether the request changed anything.
    pub changed: bool,
}

/// A leader as ranked on the leaderboard.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderView {
    /// Leader identifier.
    pub id: LeaderId,
    /// Leader's name.
    pub name: String,
    /// Office held.
    pub designation: String,
    /// Issues solved.
    pub solved_problems: u64,
    /// Portrait URL.
    pub profile_picture: Option<String>,
    /// Linked account.
    pub account_id: Option<UserId>,
}

impl From<&Leader> for LeaderView {
    fn from(leader: &Leader) -> Self {
        Self {
            id: leader.id(),
            name: leader.name().to_owned(),
            designation: leader.designation().to_owned(),
            solved_problems: leader.solved_problems(),
            profile_picture: leader.profile_picture().map(str::to_owned),
            account_id: leader.account(),
        }
    }
}

/// An issue with its resolution state.
#[derive(Debug, Clone, Serialize)]
pub struct IssueView {
    /// Issue identifier.
    pub id: IssueId,
    /// Short title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Photo URL.
    pub image_url: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Anonymous reporter tag shown to everyone.
    pub reporter_tag: String,
    /// Reporting user, shown only to the reporter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_id: Option<UserId>,
    /// Tagged leader.
    pub leader_id: LeaderId,
    /// Resolution status.
    pub status: IssueStatus,
    /// Human-readable status.
    pub status_label: &'static str,
    /// Leader resolution flag.
    pub is_leader_resolved: bool,
    /// Citizen confirmation flag.
    pub is_user_confirmed: bool,
    /// Number of distinct flaggers.
    pub flag_count: u64,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Last change timestamp.
    pub updated_at: DateTime<Utc>,
    /// Engagement counters, on detail responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<EngagementSnapshot>,
}

impl IssueView {
    /// Builds the view seen by `viewer`; only the reporter sees their own
    /// identifier.
    #[must_use]
    pub fn for_viewer(issue: &Issue, viewer: Option<UserId>) -> Self {
        let mut view = Self::from(issue);
        if viewer.is_some_and(|user| issue.is_reported_by(user)) {
            view.reporter_id = Some(issue.reporter());
        }
        view
    }

    /// Attaches engagement counters.
    #[must_use]
    pub const fn with_engagement(mut self, engagement: EngagementSnapshot) -> Self {
        self.engagement = Some(engagement);
        self
    }
}

impl From<&Issue> for IssueView {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id(),
            title: issue.title().as_str().to_owned(),
            description: issue.description().to_owned(),
            image_url: issue.image_url().map(str::to_owned),
            latitude: issue.location().latitude(),
            longitude: issue.location().longitude(),
            reporter_tag: issue.anonymous_reporter(),
            reporter_id: None,
            leader_id: issue.leader(),
            status: issue.status(),
            status_label: issue.status().label(),
            is_leader_resolved: issue.is_leader_resolved(),
            is_user_confirmed: issue.is_user_confirmed(),
            flag_count: issue.flag_count(),
            created_at: issue.created_at(),
            updated_at: issue.updated_at(),
            engagement: None,
        }
    }
}

/// Converts a list of issues as seen by `viewer`.
#[must_use]
pub fn issue_views(issues: &[Issue], viewer: Option<UserId>) -> Vec<IssueView> {
    issues
        .iter()
        .map(|issue| IssueView::for_viewer(issue, viewer))
        .collect()
}

/// Result of a resolution request.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionView {
    /// Issue after the request.
    pub issue: IssueView,
    /// Status before the change, when the status moved.
    pub previous_status: Option<IssueStatus>,
    /// Whether the request changed any flag.
    pub changed: bool,
}

impl ResolutionView {
    /// Builds the view returned to `actor`.
    #[must_use]
    pub fn for_actor(outcome: &ResolutionOutcome, actor: UserId) -> Self {
        Self {
            issue: IssueView::for_viewer(&outcome.issue, Some(actor)),
            previous_status: outcome.transition.map(|transition| transition.from),
            changed: outcome.changed,
        }
    }
}

/// Issues carrying a hashtag.
#[derive(Debug, Clone, Serialize)]
pub struct HashtagView {
    /// Normalised tag name.
    pub hashtag: String,
    /// Number of issues tagged.
    pub usage_count: u64,
    /// Tagged issues, newest first.
    pub issues: Vec<IssueView>,
}

/// A comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    /// Comment identifier.
    pub id: CommentId,
    /// Commented issue.
    pub issue_id: IssueId,
    /// Author.
    pub author_id: UserId,
    /// Comment text.
    pub content: String,
    /// Thread root for replies.
    pub parent_id: Option<CommentId>,
    /// Number of likes.
    pub like_count: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id(),
            issue_id: comment.issue(),
            author_id: comment.author(),
            content: comment.content().to_owned(),
            parent_id: comment.parent(),
            like_count: comment.like_count(),
            created_at: comment.created_at(),
        }
    }
}

/// A top-level comment and its replies.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadView {
    /// Top-level comment.
    #[serde(flatten)]
    pub comment: CommentView,
    /// Replies, oldest first.
    pub replies: Vec<CommentView>,
}

impl From<&CommentThread> for ThreadView {
    fn from(thread: &CommentThread) -> Self {
        Self {
            comment: CommentView::from(&thread.comment),
            replies: thread.replies.iter().map(CommentView::from).collect(),
        }
    }
}

/// A stored notification as listed in the inbox.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    /// Notification body.
    #[serde(flatten)]
    pub payload: NotificationPayload,
    /// Whether the recipient read it.
    pub is_read: bool,
}

/// The actor's notifications.
#[derive(Debug, Clone, Serialize)]
pub struct InboxView {
    /// Notifications, newest first.
    pub notifications: Vec<NotificationView>,
    /// Unread count.
    pub unread: u64,
}

impl From<&InboxSummary> for InboxView {
    fn from(summary: &InboxSummary) -> Self {
        Self {
            notifications: summary
                .notifications
                .iter()
                .map(|notification| NotificationView {
                    payload: NotificationPayload::from(notification),
                    is_read: notification.is_read(),
                })
                .collect(),
            unread: summary.unread,
        }
    }
}

/// A chat message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    /// Message identifier.
    pub id: ChatMessageId,
    /// Room the message belongs to.
    pub room_id: RoomId,
    /// Sender.
    pub sender_id: UserId,
    /// Message text.
    pub message: String,
    /// Attachment URL.
    pub file_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id(),
            room_id: message.room(),
            sender_id: message.sender(),
            message: message.content().to_owned(),
            file_url: message.file_url().map(str::to_owned),
            created_at: message.created_at(),
        }
    }
}

/// A chat room as seen by one participant.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummaryView {
    /// Room identifier.
    pub id: RoomId,
    /// Name shown to the viewer.
    pub display_name: String,
    /// Whether the room is a group chat.
    pub is_group_chat: bool,
    /// Participants, including the viewer.
    pub participants: Vec<UserId>,
    /// Newest message.
    pub latest_message: Option<MessageView>,
    /// Messages the viewer has not read.
    pub unread: u64,
    /// Last activity timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&RoomSummary> for RoomSummaryView {
    fn from(summary: &RoomSummary) -> Self {
        Self {
            id: summary.room.id(),
            display_name: summary.display_name.clone(),
            is_group_chat: summary.room.is_group_chat(),
            participants: participants(&summary.room),
            latest_message: summary.latest.as_ref().map(MessageView::from),
            unread: summary.unread,
            updated_at: summary.room.updated_at(),
        }
    }
}

/// A room as returned on creation or membership change.
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetailView {
    /// Room identifier.
    pub id: RoomId,
    /// Group name.
    pub name: Option<String>,
    /// Whether the room is a group chat.
    pub is_group_chat: bool,
    /// Room creator.
    pub creator_id: UserId,
    /// Participants, including the creator.
    pub participants: Vec<UserId>,
}

impl From<&ChatRoom> for RoomDetailView {
    fn from(room: &ChatRoom) -> Self {
        Self {
            id: room.id(),
            name: room.name().map(str::to_owned),
            is_group_chat: room.is_group_chat(),
            creator_id: room.creator(),
            participants: participants(room),
        }
    }
}

/// An opened room with its history.
#[derive(Debug, Clone, Serialize)]
pub struct RoomMessagesView {
    /// Room details.
    #[serde(flatten)]
    pub room: RoomDetailView,
    /// Name shown to the viewer.
    pub display_name: String,
    /// Messages, oldest first.
    pub messages: Vec<MessageView>,
}

impl From<&RoomView> for RoomMessagesView {
    fn from(view: &RoomView) -> Self {
        Self {
            room: RoomDetailView::from(&view.room),
            display_name: view.display_name.clone(),
            messages: view.messages.iter().map(MessageView::from).collect(),
        }
    }
}

fn participants(room: &ChatRoom) -> Vec<UserId> {
    room.participants().iter().copied().collect()
}
