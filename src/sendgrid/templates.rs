//! Customer-facing status email templates.
//!
//! One template per lifecycle status key; a status without a template (none
//! today, but the lookup is total either way) means "no email for this
//! change", not an error. Copy matches what customers have been receiving;
//! edit with marketing, not alone.

use crate::types::OrderStatus;

/// Rendered subject and HTML body for one status email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub html: String,
}

/// Everything the templates interpolate.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    pub customer_name: String,
    pub order_number: String,
    /// Renders a carrier tracking block when present.
    pub tracking_number: Option<String>,
    /// Renders the deliverable-folder button in the completion email.
    pub dropbox_link: Option<String>,
}

/// The carrier tracking page for a tracking number.
pub fn tracking_url(tracking_number: &str) -> String {
    format!(
        "https://www.ups.com/track?tracknum={}",
        urlencoding::encode(tracking_number)
    )
}

fn tracking_block(ctx: &TemplateContext) -> String {
    match &ctx.tracking_number {
        Some(tracking) => format!(
            r#"
            <p><strong>Tracking Number:</strong> {tracking}</p>
            <p>
              <a
                href="{url}"
                style="display:inline-block;background-color:#351c75;color:white;padding:12px 24px;text-decoration:none;border-radius:5px;font-weight:bold;"
              >Track on UPS</a>
            </p>
          "#,
            tracking = tracking,
            url = tracking_url(tracking),
        ),
        None => String::new(),
    }
}

fn dropbox_block(ctx: &TemplateContext) -> String {
    match &ctx.dropbox_link {
        Some(link) => format!(
            r#"
            <p><strong>Access your digitized memories here:</strong></p>
            <p><a href="{link}" style="display:inline-block;background-color:#0061ff;color:white;padding:12px 24px;text-decoration:none;border-radius:5px;font-weight:bold;">View Your Files</a></p>
          "#,
        ),
        None => String::new(),
    }
}

/// Returns the email for a status change, or `None` when that status sends
/// no customer email.
pub fn status_email(status: OrderStatus, ctx: &TemplateContext) -> Option<EmailTemplate> {
    let name = &ctx.customer_name;
    let order = &ctx.order_number;

    let template = match status {
        OrderStatus::Pending => EmailTemplate {
            subject: format!("Order {order} - We've Received Your Order!"),
            html: format!(
                r#"
          <h2>Thank you for your order, {name}!</h2>
          <p>We've received your order <strong>{order}</strong> and are preparing your Heritage Box kit.</p>
          <p><strong>Next Steps:</strong></p>
          <ul>
            <li>We'll send you a Heritage Box kit in the mail</li>
            <li>When you receive it, fill it with your precious memories</li>
            <li>Send it back to us using the prepaid label</li>
          </ul>
          <p>Questions? Just reply to this email!</p>
          <p>— The Heritage Box Team</p>
        "#
            ),
        },
        OrderStatus::KitSent => EmailTemplate {
            subject: format!("Order {order} - Your Kit is On The Way! 📦"),
            html: format!(
                r#"
          <h2>Great news, {name}!</h2>
          <p>Your Heritage Box kit for order <strong>{order}</strong> has been shipped!</p>
          {tracking}
          <p><strong>What to do when it arrives:</strong></p>
          <ol>
            <li>Carefully pack your photos, videos, and memorabilia</li>
            <li>Use the included prepaid shipping label</li>
            <li>Send it back to us - we'll handle the rest!</li>
          </ol>
          <p>We can't wait to digitize your memories!</p>
          <p>— The Heritage Box Team</p>
        "#,
                tracking = tracking_block(ctx),
            ),
        },
        OrderStatus::MediaReceived => EmailTemplate {
            subject: format!("Order {order} - We've Received Your Memories! 📸"),
            html: format!(
                r#"
          <h2>Perfect, {name}!</h2>
          <p>We've received your Heritage Box for order <strong>{order}</strong>.</p>
          <p>Our team is now carefully cataloging your items and will begin the digitization process soon.</p>
          <p><strong>What happens next:</strong></p>
          <ul>
            <li>Quality check of all materials</li>
            <li>Professional digitization</li>
            <li>Quality control review</li>
            <li>Safe return of your originals</li>
          </ul>
          <p>We'll keep you updated throughout the process!</p>
          <p>— The Heritage Box Team</p>
        "#
            ),
        },
        OrderStatus::Digitizing => EmailTemplate {
            subject: format!("Order {order} - Digitization In Progress 🎬"),
            html: format!(
                r#"
          <h2>Hi {name},</h2>
          <p>Great news! We're currently digitizing your memories for order <strong>{order}</strong>.</p>
          <p>Our specialists are working carefully to preserve every detail of your precious items.</p>
          <p>You'll receive another update once we move to quality check!</p>
          <p>— The Heritage Box Team</p>
        "#
            ),
        },
        OrderStatus::QualityCheck => EmailTemplate {
            subject: format!("Order {order} - Quality Review Underway ✓"),
            html: format!(
                r#"
          <h2>Hi {name},</h2>
          <p>Your digitized files for order <strong>{order}</strong> are now in quality review.</p>
          <p>We're ensuring every photo and video meets our high standards before delivery.</p>
          <p>Almost done!</p>
          <p>— The Heritage Box Team</p>
        "#
            ),
        },
        OrderStatus::ShippingBack => EmailTemplate {
            subject: format!("Order {order} - Your Originals Are Coming Home! 📦"),
            html: format!(
                r#"
          <h2>Hi {name},</h2>
          <p>We've carefully packaged your original items and they're heading back to you!</p>
          <p>Order <strong>{order}</strong> is on its way.</p>
          {tracking}
          <p>You'll receive your digital files very soon!</p>
          <p>— The Heritage Box Team</p>
        "#,
                tracking = tracking_block(ctx),
            ),
        },
        OrderStatus::Complete => EmailTemplate {
            subject: format!("Order {order} - Your Digital Memories Are Ready! 🎉"),
            html: format!(
                r#"
          <h2>Congratulations, {name}!</h2>
          <p>Your order <strong>{order}</strong> is complete!</p>
          {dropbox}
          <p><strong>What you'll find:</strong></p>
          <ul>
            <li>High-quality scans of all your photos</li>
            <li>Digitized videos in modern formats</li>
            <li>Organized folders for easy browsing</li>
          </ul>
          <p>Your original items should arrive back to you soon if they haven't already.</p>
          <p>Thank you for trusting us with your precious memories!</p>
          <p>— The Heritage Box Team</p>
        "#,
                dropbox = dropbox_block(ctx),
            ),
        },
        OrderStatus::Canceled => EmailTemplate {
            subject: format!("Order {order} - Order Canceled"),
            html: format!(
                r#"
          <h2>Hi {name},</h2>
          <p>Your order <strong>{order}</strong> has been canceled.</p>
          <p>If you have any questions or if this was done in error, please don't hesitate to reach out.</p>
          <p>— The Heritage Box Team</p>
        "#
            ),
        },
    };

    Some(template)
}
