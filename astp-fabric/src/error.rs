use astp_core::Rank;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FabricError {
    #[error("mailbox for rank {0} is closed")]
    MailboxClosed(Rank),

    #[error("rank {0} is not a member of the group it tried to split into")]
    NotAMember(Rank),
}
