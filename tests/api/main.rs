mod health_check;
mod pages;
mod subscriptions;
