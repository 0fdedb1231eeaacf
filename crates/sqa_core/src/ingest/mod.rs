pub mod reranked;
