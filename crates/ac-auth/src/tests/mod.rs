mod invite;
