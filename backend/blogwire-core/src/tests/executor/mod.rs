mod merge;
mod redirects;
