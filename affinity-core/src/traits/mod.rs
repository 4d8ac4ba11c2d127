mod analysis;
mod storage;

pub use analysis::IAnalysisProvider;
pub use storage::{
    IDocumentStore, IEmbeddingStorage, IMessageStorage, IProfileChangeFeed, IProfileStorage,
    IStatsStorage, IUserStorage,
};
