mod health_check;
mod jobs;
mod order;
mod product;
