//! UI action helpers shared by scenarios

use crate::locator::Locator;
use crate::page::Page;

/// Fill the login form and submit it.
pub fn login_with(page: &mut Page, username: &str, password: &str) {
    page.fill(Locator::test_id("username-input"), username)
        .fill(Locator::test_id("password-input"), password)
        .click(Locator::button("Login"));
}

/// Open the blog form, fill it, and submit it.
pub fn create_new_blog(page: &mut Page, title: &str, author: &str, url: &str) {
    page.click(Locator::button("New blog"))
        .fill(Locator::test_id("blog-title-input"), title)
        .fill(Locator::test_id("blog-author-input"), author)
        .fill(Locator::test_id("blog-url-input"), url)
        .click(Locator::button("Create"));
}
