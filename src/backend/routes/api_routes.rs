/**
 * API Routes
 *
 * Mounted under `/api`. Every route requires a bearer token.
 *
 * # Routes
 *
 * ## Contacts
 * - `GET /api/contacts` - List contacts
 * - `GET /api/contacts/{status}` - List contacts with one status
 * - `POST /api/contacts/{contact_id}` - Add a contact
 * - `PUT /api/contacts/{contact_id}/block` - Block a user
 * - `DELETE /api/contacts/{contact_id}` - Delete a contact
 *
 * ## Chats
 * - `GET /api/chats` - List chats
 * - `POST /api/chats/{other_user_id}` - Create or find a chat
 * - `GET /api/chats/{chat_id}/messages` - Chat messages
 * - `DELETE /api/chats/{chat_id}` - Delete a chat and its messages
 *
 * ## Messages
 * - `POST /api/messages/{receiver_id}/send` - Send a direct message
 * - `PUT /api/messages/{msg_id}/update/{status}` - Mark delivered/read
 *
 * ## Groups
 * - `GET|POST /api/groups`
 * - `GET|PUT|DELETE /api/groups/{group_id}`
 * - `PUT /api/groups/{group_id}/members` and `/members/{user_id}`
 * - `PUT /api/groups/{group_id}/admin/{user_id}`
 * - `PUT /api/groups/{group_id}/leave`
 * - `GET|POST /api/groups/{group_id}/messages`
 *
 * ## Notifications
 * - `GET /api/notifications`
 * - `PUT /api/notifications/read` - Clear all
 * - `PUT /api/notifications/{notification_id}/read` - Clear one
 *
 * Routes that share a path prefix also share the parameter name in the
 * pattern (`{id}`), since the router rejects differently named parameters
 * at the same position.
 */

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;
use crate::backend::{chats, contacts, groups, messages, notifications};

/// Build the `/api` router with the auth guard applied to every route
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Contacts
        .route("/contacts", get(contacts::list_contacts))
        .route(
            "/contacts/{id}",
            get(contacts::list_contacts_by_status)
                .post(contacts::add_contact)
                .delete(contacts::delete_contact),
        )
        .route("/contacts/{id}/block", put(contacts::block_contact))
        // Chats
        .route("/chats", get(chats::list_chats))
        .route("/chats/{id}", post(chats::create_chat).delete(chats::delete_chat))
        .route("/chats/{id}/messages", get(chats::get_chat_messages))
        // Messages
        .route("/messages/{id}/send", post(messages::send_message))
        .route("/messages/{id}/update/{status}", put(messages::update_message_status))
        // Groups
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route(
            "/groups/{group_id}",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route("/groups/{group_id}/members", put(groups::add_members))
        .route("/groups/{group_id}/members/{user_id}", put(groups::remove_member))
        .route("/groups/{group_id}/admin/{user_id}", put(groups::appoint_admin))
        .route("/groups/{group_id}/leave", put(groups::leave_group))
        .route(
            "/groups/{group_id}/messages",
            get(groups::get_group_messages).post(groups::send_group_message),
        )
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read", put(notifications::mark_all_as_read))
        .route("/notifications/{id}/read", put(notifications::mark_as_read))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
