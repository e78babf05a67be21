//! Localized notification texts
//!
//! Users carry a language code; anything other than `tr` falls back to
//! English.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Tr,
}

impl Language {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "tr" => Language::Tr,
            _ => Language::En,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    NewFollow,
    FollowStart,
    NewComment,
    PostComment,
    UpvoteTitle,
    PostUpvote,
    CommentUpvote,
}

impl Message {
    /// Raw template; `{}` marks where the actor's name goes
    pub fn template(self, language: Language) -> &'static str {
        use Language::*;
        use Message::*;

        match (self, language) {
            (NewFollow, En) => "A New Follower!",
            (NewFollow, Tr) => "Yeni Bir Takipçi!",
            (FollowStart, En) => "{} started following you",
            (FollowStart, Tr) => "{} seni takip etmeye başladı",
            (NewComment, En) => "A Comment!",
            (NewComment, Tr) => "Bir Yorum!",
            (PostComment, En) => "{} commented on your post",
            (PostComment, Tr) => "{} paylaşımına yorum yaptı",
            (UpvoteTitle, En) => "An Upvote!",
            (UpvoteTitle, Tr) => "Bir Oylama!",
            (PostUpvote, En) => "{} upvoted your post",
            (PostUpvote, Tr) => "{} paylaşımını oyladı",
            (CommentUpvote, En) => "{} upvoted your comment",
            (CommentUpvote, Tr) => "{} yorumunu oyladı",
        }
    }

    pub fn render(self, language: Language, actor: &str) -> String {
        self.template(language).replace("{}", actor)
    }
}

/// Title/body pair sent for one kind of event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub title: Message,
    pub body: Message,
}

impl Template {
    pub const FOLLOW: Template = Template {
        title: Message::NewFollow,
        body: Message::FollowStart,
    };
    pub const POST_COMMENT: Template = Template {
        title: Message::NewComment,
        body: Message::PostComment,
    };
    pub const POST_UPVOTE: Template = Template {
        title: Message::UpvoteTitle,
        body: Message::PostUpvote,
    };
    pub const COMMENT_UPVOTE: Template = Template {
        title: Message::UpvoteTitle,
        body: Message::CommentUpvote,
    };

    /// Rendered (title, body)
    pub fn render(self, language: Language, actor: &str) -> (String, String) {
        (
            self.title.render(language, actor),
            self.body.render(language, actor),
        )
    }
}
